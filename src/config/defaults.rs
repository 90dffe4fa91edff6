use crossterm::event::KeyCode;

use crate::config::key::{Key, KeyBinding};
use crate::config::keybindings::{
    AuthKeybindings, CatalogKeybindings, DialogKeybindings, GlobalKeybindings,
    NavigationKeybindings,
};

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::new(KeyCode::Char('q')).into(),
            back: Key::new(KeyCode::Esc).into(),
            suspend: Key::with_ctrl(KeyCode::Char('z')).into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![Key::new(KeyCode::Char('k')), Key::new(KeyCode::Up)]),
            down: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('j')),
                Key::new(KeyCode::Down),
            ]),
            left: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('h')),
                Key::new(KeyCode::Left),
            ]),
            right: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('l')),
                Key::new(KeyCode::Right),
            ]),
            home: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('g')),
                Key::new(KeyCode::Home),
            ]),
            end: KeyBinding::multiple(vec![Key::new(KeyCode::Char('G')), Key::new(KeyCode::End)]),
        }
    }
}

impl Default for CatalogKeybindings {
    fn default() -> Self {
        Self {
            order: KeyBinding::multiple(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Char('o')),
            ]),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            confirm: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('y')),
                Key::new(KeyCode::Char('Y')),
                Key::new(KeyCode::Enter),
            ]),
            cancel: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('n')),
                Key::new(KeyCode::Char('N')),
                Key::new(KeyCode::Esc),
            ]),
            dismiss: KeyBinding::multiple(vec![
                Key::new(KeyCode::Enter),
                Key::new(KeyCode::Esc),
                Key::new(KeyCode::Char('q')),
            ]),
            increase: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('+')),
                Key::new(KeyCode::Right),
                Key::new(KeyCode::Char('l')),
            ]),
            decrease: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('-')),
                Key::new(KeyCode::Left),
                Key::new(KeyCode::Char('h')),
            ]),
        }
    }
}

impl Default for AuthKeybindings {
    fn default() -> Self {
        Self {
            recheck: Key::new(KeyCode::Char('r')).into(),
        }
    }
}
