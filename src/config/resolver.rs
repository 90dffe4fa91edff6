use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{AuthAction, CatalogAction, DialogAction, GlobalAction, NavAction};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to actions using the configured keybindings.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Back => &kb.back,
            GlobalAction::Suspend => &kb.suspend,
        }
    }

    fn nav(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::Left => &kb.left,
            NavAction::Right => &kb.right,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
        }
    }

    fn catalog(&self, action: CatalogAction) -> &KeyBinding {
        match action {
            CatalogAction::Order => &self.keybindings.catalog.order,
        }
    }

    fn dialog(&self, action: DialogAction) -> &KeyBinding {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Confirm => &kb.confirm,
            DialogAction::Cancel => &kb.cancel,
            DialogAction::Dismiss => &kb.dismiss,
            DialogAction::Increase => &kb.increase,
            DialogAction::Decrease => &kb.decrease,
        }
    }

    fn auth(&self, action: AuthAction) -> &KeyBinding {
        match action {
            AuthAction::Recheck => &self.keybindings.auth.recheck,
        }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global(action).display()
    }

    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav(action).display()
    }

    pub fn matches_catalog(&self, event: &KeyEvent, action: CatalogAction) -> bool {
        self.catalog(action).matches(event)
    }

    pub fn display_catalog(&self, action: CatalogAction) -> String {
        self.catalog(action).display()
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        self.dialog(action).matches(event)
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        self.dialog(action).display()
    }

    pub fn matches_auth(&self, event: &KeyEvent, action: AuthAction) -> bool {
        self.auth(action).matches(event)
    }

    pub fn display_auth(&self, action: AuthAction) -> String {
        self.auth(action).display()
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings_resolve() {
        let resolver = KeyResolver::default();
        assert!(resolver.matches_global(&key(KeyCode::Char('q')), GlobalAction::Quit));
        assert!(resolver.matches_nav(&key(KeyCode::Right), NavAction::Right));
        assert!(resolver.matches_nav(&key(KeyCode::Char('l')), NavAction::Right));
        assert!(resolver.matches_catalog(&key(KeyCode::Enter), CatalogAction::Order));
        assert!(resolver.matches_dialog(&key(KeyCode::Char('+')), DialogAction::Increase));
        assert!(!resolver.matches_catalog(&key(KeyCode::Char('x')), CatalogAction::Order));
    }

    #[test]
    fn test_display_joins_alternatives() {
        let resolver = KeyResolver::default();
        assert_eq!(resolver.display_catalog(CatalogAction::Order), "Enter/o");
        assert_eq!(resolver.display_global(GlobalAction::Suspend), "ctrl+z");
    }
}
