//! The page an order attempt without a session lands on.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tracing::info;

use crate::Theme;
use crate::app::Route;
use crate::commands::{NotifyCmd, RedirectCmd};
use crate::config::{AuthAction, GlobalAction, KeyResolver};
use crate::session::SessionProvider;
use crate::ui::{EventResult, Keybinding, Result, Screen, ScreenMsg, ToastType};

pub struct AuthScreen {
    session: Arc<dyn SessionProvider>,
    resolver: Arc<KeyResolver>,
    recheck_requested: bool,
}

impl AuthScreen {
    pub fn new(session: Arc<dyn SessionProvider>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            session,
            resolver,
            recheck_requested: false,
        }
    }

    fn recheck(&self) -> ScreenMsg {
        match self.session.current() {
            Some(session) => {
                info!(customer = %session.document_id, "Session found, back to the catalog");
                ScreenMsg::Run(vec![
                    Box::new(NotifyCmd::new(
                        format!("Logged in as {}", session.display_name()),
                        ToastType::Success,
                    )),
                    Box::new(RedirectCmd::new(Route::Catalog, Duration::ZERO)),
                ])
            }
            None => NotifyCmd::new("Still not logged in.", ToastType::Info).into(),
        }
    }
}

impl Screen for AuthScreen {
    fn init(&mut self) {
        self.recheck_requested = false;
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        if self.resolver.matches_auth(&key, AuthAction::Recheck) {
            self.recheck_requested = true;
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    fn update(&mut self) -> Result<ScreenMsg> {
        if !std::mem::take(&mut self.recheck_requested) {
            return Ok(ScreenMsg::Idle);
        }
        Ok(self.recheck())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = area.centered(Constraint::Percentage(60), Constraint::Length(12));

        let key_style = Style::default().fg(theme.peach()).add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(theme.text());

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "You need to be logged in to place an order.",
                text_style.add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Log in or register on the website. Your session is read from:",
                Style::default().fg(theme.subtext0()),
            )),
            Line::from(Span::styled(
                self.session.location(),
                Style::default().fg(theme.lavender()),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("[{}]", self.resolver.display_auth(AuthAction::Recheck)), key_style),
                Span::styled(" Check again    ", text_style),
                Span::styled(format!("[{}]", self.resolver.display_global(GlobalAction::Back)), key_style),
                Span::styled(" Back to services", text_style),
            ]),
        ];

        let block = Block::default()
            .title(" Login required ")
            .title_style(Style::default().fg(theme.red()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.red()));

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            popup,
        );
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec!["Login".to_string()]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        vec![Keybinding::new(
            self.resolver.display_auth(AuthAction::Recheck),
            "Check again",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StaticSessionProvider;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn screen(session: StaticSessionProvider) -> AuthScreen {
        AuthScreen::new(Arc::new(session), Arc::new(KeyResolver::default()))
    }

    fn recheck(screen: &mut AuthScreen) -> Vec<String> {
        let result = screen.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE));
        assert_eq!(result, EventResult::Consumed);
        match screen.update().unwrap() {
            ScreenMsg::Run(cmds) => cmds.iter().map(|c| c.name()).collect(),
            ScreenMsg::Idle => vec![],
        }
    }

    #[test]
    fn test_recheck_without_session_only_notifies() {
        let mut screen = screen(StaticSessionProvider::guest());
        assert_eq!(recheck(&mut screen), vec!["Notify: Still not logged in."]);
    }

    #[test]
    fn test_recheck_with_session_returns_to_catalog() {
        let mut screen = screen(StaticSessionProvider::logged_in("cust-1"));
        let names = recheck(&mut screen);

        assert_eq!(names.len(), 2);
        assert!(names[1].starts_with("Redirect to Catalog"));
    }

    #[test]
    fn test_nothing_to_do_without_key() {
        let mut screen = screen(StaticSessionProvider::guest());
        assert!(matches!(screen.update().unwrap(), ScreenMsg::Idle));
        assert_eq!(
            screen.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            EventResult::Ignored
        );
    }
}
