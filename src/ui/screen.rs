//! Screen trait for full-page views.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::commands::Command;
use crate::ui::{EventResult, Keybinding, Result};

pub enum ScreenMsg {
    /// No action needed
    Idle,
    /// Run one or more commands
    Run(Vec<Box<dyn Command>>),
}

impl<T: Command> From<T> for ScreenMsg {
    fn from(value: T) -> Self {
        Self::Run(vec![Box::new(value)])
    }
}

/// A full page of the application.
///
/// Screens manage their own internal state and message queue. The App calls
/// methods in this order:
///
/// 1. `init()` - once when the screen is created
/// 2. `update()` - immediately after init to process startup messages
/// 3. For each event:
///    - `handle_tick()` if tick event
///    - `handle_key()` if key event, then `update()`
/// 4. When a command reports back: `update()`
pub trait Screen {
    /// Queue the startup message(s).
    fn init(&mut self) {}

    /// Handle a tick event for animations.
    fn handle_tick(&mut self) {}

    /// Handle a key event.
    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()>;

    /// Process all queued messages and return the commands to run.
    ///
    /// # Errors
    /// Returns an error if message processing fails.
    fn update(&mut self) -> Result<ScreenMsg>;

    /// Render the screen to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Breadcrumb segments for the navigation bar.
    fn breadcrumbs(&self) -> Vec<String>;

    /// Returns the keybindings for the current state of this screen.
    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}
