use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use throbber_widgets_tui::WhichUse::Spin;
use throbber_widgets_tui::{BRAILLE_SIX, Throbber, ThrobberState};

use crate::Theme;
use crate::ui::Component;

/// Centered loading indicator with an optional label.
pub struct Spinner {
    throbber_state: ThrobberState,
    label: Option<String>,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            throbber_state: ThrobberState::default(),
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Spinner {
    type Output = ();

    fn handle_tick(&mut self) {
        self.throbber_state.calc_next();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut throbber = Throbber::default()
            .throbber_set(BRAILLE_SIX)
            .use_type(Spin)
            .throbber_style(Style::default().fg(theme.pink()))
            .style(Style::default().fg(theme.subtext1()));

        // The throbber glyph is one cell wide
        let mut width = 1u16;

        if let Some(label) = &self.label {
            throbber = throbber.label(label.clone());
            width = width.saturating_add(u16::try_from(label.chars().count() + 1).unwrap_or(u16::MAX));
        }

        let area = area.centered(Constraint::Length(width), Constraint::Length(1));

        frame.render_stateful_widget(throbber, area, &mut self.throbber_state);
    }
}
