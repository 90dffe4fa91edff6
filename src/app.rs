//! Application shell: routing, the event loop and app-wide overlays.
//!
//! # Terminology
//! - **Event**: input from the terminal (key, tick, render), see [`crate::tui::Event`]
//! - **Message**: app-level state change sent by commands, see [`AppMessage`]
//! - **Command**: async side effect spawned here, see [`crate::commands::Command`]
//!
//! Page-specific messages stay inside each screen's own queue.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::Theme;
use crate::auth::AuthScreen;
use crate::catalog::CatalogScreen;
use crate::client::CatalogClient;
use crate::commands::Command;
use crate::config::{AppConfig, GlobalAction, KeyResolver};
use crate::session::SessionProvider;
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, ErrorDialog, ErrorDialogEvent, EventResult, Result, Screen, ScreenMsg, StatusBar,
    Toast, ToastManager, ToastType,
};

/// Status bar: five logo rows plus borders.
const STATUS_BAR_HEIGHT: u16 = 7;

/// Pages the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Catalog,
    Authentication,
}

/// Application-level messages for state transitions and global state.
#[derive(Debug, Clone)]
pub enum AppMessage {
    // === Lifecycle ===
    /// Suspend the application (Ctrl+Z)
    Suspend,
    /// Resume from suspension
    Resume,
    /// Quit the application
    Quit,
    /// Clear and redraw the screen
    ClearScreen,

    // === Feedback ===
    /// Show a transient notification
    ShowToast {
        message: String,
        toast_type: ToastType,
    },
    /// Display an error to the user
    DisplayError(String),

    // === Navigation ===
    /// Switch to another page
    Navigate(Route),
}

pub struct App {
    route: Route,
    catalog: CatalogScreen,
    auth: AuthScreen,
    session: Arc<dyn SessionProvider>,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    status_bar: StatusBar,
    toasts: ToastManager,
    error_dialog: Option<ErrorDialog>,
    should_quit: bool,
    should_suspend: bool,
    app_tx: UnboundedSender<AppMessage>,
    app_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(
        config: &AppConfig,
        client: Arc<dyn CatalogClient>,
        session: Arc<dyn SessionProvider>,
        resolver: Arc<KeyResolver>,
        theme: Theme,
    ) -> Self {
        let (app_tx, app_rx) = mpsc::unbounded_channel();

        let mut status_bar = StatusBar::new(client.endpoint(), resolver.clone());
        status_bar.set_session(session.current());

        let mut catalog = CatalogScreen::new(
            client,
            session.clone(),
            resolver.clone(),
            Duration::from_millis(config.order.login_redirect_delay_ms),
        )
        .with_address(config.shop.address.clone());
        catalog.init();

        Self {
            route: Route::Catalog,
            catalog,
            auth: AuthScreen::new(session.clone(), resolver.clone()),
            session,
            resolver,
            theme,
            status_bar,
            toasts: ToastManager::new(),
            error_dialog: None,
            should_quit: false,
            should_suspend: false,
            app_tx,
            app_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(60.0, 4.0)?;
        tui.enter()?;

        // Process startup messages queued by init()
        self.update_screen();

        loop {
            if let Some(event) = tui.next_event().await {
                self.handle_event(&mut tui, event)?;
            }
            self.process_messages(&mut tui)?;

            if self.should_suspend {
                tui.suspend()?;
                self.app_tx.send(AppMessage::Resume)?;
                self.app_tx.send(AppMessage::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    pub const fn route(&self) -> Route {
        self.route
    }

    fn screen(&self) -> &dyn Screen {
        match self.route {
            Route::Catalog => &self.catalog,
            Route::Authentication => &self.auth,
        }
    }

    fn screen_mut(&mut self) -> &mut dyn Screen {
        match self.route {
            Route::Catalog => &mut self.catalog,
            Route::Authentication => &mut self.auth,
        }
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> Result<()> {
        match event {
            Event::Quit => self.should_quit = true,
            Event::Tick => self.handle_tick(),
            Event::Render => self.render(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            Event::Key(key) => self.handle_key(key),
            Event::Error(e) => error!("Terminal event error: {e}"),
        }
        // Commands report back through screen queues as well as app messages.
        self.update_screen();
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.screen_mut().handle_tick();
        self.toasts.handle_tick();
        // Picks up logins made elsewhere while the app is open.
        self.status_bar.set_session(self.session.current());
    }

    /// Route a key: error dialog, then the page, then global bindings.
    fn handle_key(&mut self, key: KeyEvent) {
        if let Some(dialog) = self.error_dialog.as_mut() {
            match dialog.handle_key(key) {
                Ok(EventResult::Event(ErrorDialogEvent::Dismissed)) => self.error_dialog = None,
                Ok(_) => {}
                Err(e) => error!("Error dialog failed to handle key: {e}"),
            }
            return;
        }

        if self.screen_mut().handle_key(key).is_consumed() {
            return;
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if self.resolver.matches_global(&key, GlobalAction::Suspend) {
            self.should_suspend = true;
        } else if self.resolver.matches_global(&key, GlobalAction::Back)
            && self.route == Route::Authentication
        {
            self.navigate(Route::Catalog);
        }
    }

    fn update_screen(&mut self) {
        match self.screen_mut().update() {
            Ok(ScreenMsg::Idle) => {}
            Ok(ScreenMsg::Run(commands)) => self.spawn_commands(commands),
            Err(e) => {
                let _ = self
                    .app_tx
                    .send(AppMessage::DisplayError(format!("Error updating page: {e}")));
            }
        }
    }

    fn spawn_commands(&self, commands: Vec<Box<dyn Command>>) {
        for command in commands {
            let name = command.name();
            let app_tx = self.app_tx.clone();
            debug!("Spawning command: {name}");
            tokio::spawn(async move {
                if let Err(e) = command.execute(app_tx.clone()).await {
                    error!("Command '{name}' failed: {e}");
                    let _ = app_tx.send(AppMessage::DisplayError(format!("{name} failed: {e}")));
                }
            });
        }
    }

    fn process_messages(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(msg) = self.app_rx.try_recv() {
            match msg {
                AppMessage::Suspend => self.should_suspend = true,
                AppMessage::Resume => self.should_suspend = false,
                AppMessage::ClearScreen => tui.clear()?,
                other => self.apply(other),
            }
        }
        Ok(())
    }

    /// Apply a message that does not need the terminal.
    fn apply(&mut self, msg: AppMessage) {
        debug!("Handling message: {msg:?}");
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::ShowToast {
                message,
                toast_type,
            } => self.toasts.show(Toast::new(message, toast_type)),
            AppMessage::DisplayError(message) => {
                self.error_dialog = Some(ErrorDialog::new(message, self.resolver.clone()));
            }
            AppMessage::Navigate(route) => self.navigate(route),
            AppMessage::Suspend | AppMessage::Resume | AppMessage::ClearScreen => {}
        }
    }

    fn navigate(&mut self, route: Route) {
        if self.route == route {
            return;
        }
        info!("Navigating from {:?} to {:?}", self.route, route);
        self.route = route;
        if route == Route::Authentication {
            self.auth.init();
        }
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(STATUS_BAR_HEIGHT)])
            .split(area);

        let theme = self.theme;
        self.screen_mut().render(frame, chunks[0], &theme);

        let screen = self.screen();
        let breadcrumbs = screen.breadcrumbs();
        let keybindings = screen.keybindings();
        self.status_bar.set_breadcrumbs(breadcrumbs);
        self.status_bar
            .render_with_keybindings(frame, chunks[1], &theme, &keybindings);

        self.toasts.render(frame, area, &theme);

        if let Some(dialog) = self.error_dialog.as_mut() {
            dialog.render(frame, area, &theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogResponse;
    use crate::client::{ClientError, OrderDraft};
    use crate::session::StaticSessionProvider;
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    struct EmptyClient;

    #[async_trait]
    impl CatalogClient for EmptyClient {
        async fn fetch_catalog(&self) -> std::result::Result<CatalogResponse, ClientError> {
            Ok(CatalogResponse { data: vec![] })
        }

        async fn submit_order(&self, _order: &OrderDraft) -> std::result::Result<(), ClientError> {
            Ok(())
        }

        fn endpoint(&self) -> String {
            "http://localhost:1337".to_string()
        }
    }

    fn app(session: StaticSessionProvider) -> App {
        App::new(
            &AppConfig::default(),
            Arc::new(EmptyClient),
            Arc::new(session),
            Arc::new(KeyResolver::default()),
            Theme::default(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_navigate_and_back() {
        let mut app = app(StaticSessionProvider::guest());
        app.apply(AppMessage::Navigate(Route::Authentication));
        assert_eq!(app.route(), Route::Authentication);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.route(), Route::Catalog);

        // Back on the catalog has nowhere to go.
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.route(), Route::Catalog);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_and_suspend_keys() {
        let mut app = app(StaticSessionProvider::guest());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = self::app(StaticSessionProvider::guest());
        app.handle_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL));
        assert!(app.should_suspend);
    }

    #[test]
    fn test_error_dialog_captures_keys_until_dismissed() {
        let mut app = app(StaticSessionProvider::guest());
        app.apply(AppMessage::DisplayError("Ordering failed".to_string()));
        assert!(screen_text(&mut app).contains("Ordering failed"));

        press(&mut app, KeyCode::Char('x'));
        assert!(app.error_dialog.is_some());
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Enter);
        assert!(app.error_dialog.is_none());
    }

    #[test]
    fn test_toast_message_is_rendered() {
        let mut app = app(StaticSessionProvider::guest());
        app.apply(AppMessage::ShowToast {
            message: "Order placed".to_string(),
            toast_type: ToastType::Success,
        });
        assert!(screen_text(&mut app).contains("Order placed"));
    }

    #[test]
    fn test_status_bar_shows_visitor_and_backend() {
        let mut app = app(StaticSessionProvider::guest());
        let text = screen_text(&mut app);
        assert!(text.contains("Guest"));
        assert!(text.contains("http://localhost:1337"));

        let mut app = self::app(StaticSessionProvider::logged_in("cust-9"));
        assert!(screen_text(&mut app).contains("cust-9"));
    }

    #[tokio::test]
    async fn test_failed_command_opens_error_dialog() {
        struct Failing;

        #[async_trait]
        impl Command for Failing {
            fn name(&self) -> String {
                "Failing".to_string()
            }

            async fn execute(self: Box<Self>, _app_tx: UnboundedSender<AppMessage>) -> Result<()> {
                Err(color_eyre::eyre::eyre!("boom"))
            }
        }

        let mut app = app(StaticSessionProvider::guest());
        app.spawn_commands(vec![Box::new(Failing)]);

        let msg = app.app_rx.recv().await.unwrap();
        assert!(matches!(&msg, AppMessage::DisplayError(m) if m == "Failing failed: boom"));
        app.apply(msg);
        assert!(app.error_dialog.is_some());
    }
}
