use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::Theme;
use crate::app::Route;
use crate::catalog::command::{FetchCatalogCmd, SubmitOrderCmd};
use crate::catalog::controller::{CatalogController, OrderRequest};
use crate::catalog::currency::format_rupiah;
use crate::catalog::message::CatalogMsg;
use crate::catalog::model::{Service, ServiceCategory};
use crate::catalog::order_dialog::{OrderDialog, OrderEvent};
use crate::client::CatalogClient;
use crate::commands::{Command, NotifyCmd, RedirectCmd};
use crate::config::{CatalogAction, DialogAction, KeyResolver, NavAction};
use crate::session::SessionProvider;
use crate::ui::{Component, EventResult, Keybinding, Modal, Result, Screen, ScreenMsg, Spinner};

pub const LOGIN_REQUIRED_MESSAGE: &str =
    "You are not logged in. Log in or register first to place an order.";

/// Rule, title and service strip.
const HEADER_HEIGHT: u16 = 5;
/// Header plus name, price and button rows; the description comes on top.
const DETAIL_CHROME: u16 = HEADER_HEIGHT + 3;
const DETAIL_INDENT: u16 = 2;
const BUTTON_GAP: &str = "  ";

/// The service catalog page.
pub struct CatalogScreen {
    controller: CatalogController,
    client: Arc<dyn CatalogClient>,
    resolver: Arc<KeyResolver>,
    spinner: Spinner,
    order_dialog: Option<OrderDialog>,
    redirect_delay: Duration,
    /// Category receiving left/right/order keys.
    focus: usize,
    /// First category drawn; follows the focus.
    scroll: usize,
    /// Shop address in the page footer.
    address: Option<String>,
    msg_tx: UnboundedSender<CatalogMsg>,
    msg_rx: UnboundedReceiver<CatalogMsg>,
}

impl CatalogScreen {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        session: Arc<dyn SessionProvider>,
        resolver: Arc<KeyResolver>,
        redirect_delay: Duration,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            controller: CatalogController::new(session),
            client,
            resolver,
            spinner: Spinner::new().with_label("Loading..."),
            order_dialog: None,
            redirect_delay,
            focus: 0,
            scroll: 0,
            address: None,
            msg_tx,
            msg_rx,
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        self.address = (!address.trim().is_empty()).then_some(address);
        self
    }

    /// Queue a message to be processed by `update()`.
    fn queue(&self, msg: CatalogMsg) {
        let _ = self.msg_tx.send(msg);
    }

    pub const fn controller(&self) -> &CatalogController {
        &self.controller
    }

    fn process_message(&mut self, msg: CatalogMsg) -> ScreenMsg {
        match msg {
            CatalogMsg::Mount => {
                FetchCatalogCmd::new(self.client.clone(), self.msg_tx.clone()).into()
            }

            CatalogMsg::CatalogLoaded(result) => {
                self.controller.finish_loading(result);
                self.focus = 0;
                self.scroll = 0;
                ScreenMsg::Idle
            }

            CatalogMsg::SelectService { category, service } => {
                self.controller.select_service(category, service);
                ScreenMsg::Idle
            }

            CatalogMsg::RequestOrder(service_id) => self.request_order(&service_id),

            CatalogMsg::CloseDialog => {
                self.controller.close_dialog();
                self.order_dialog = None;
                ScreenMsg::Idle
            }

            CatalogMsg::SubmitOrder(draft) => {
                let name = self
                    .controller
                    .service(&draft.service_id)
                    .map_or_else(|| draft.service_id.clone(), |s| s.name.clone());
                SubmitOrderCmd::new(self.client.clone(), draft, name).into()
            }
        }
    }

    fn request_order(&mut self, service_id: &str) -> ScreenMsg {
        match self.controller.request_order(service_id) {
            OrderRequest::LoginRequired => ScreenMsg::Run(vec![
                Box::new(NotifyCmd::error(LOGIN_REQUIRED_MESSAGE)),
                Box::new(RedirectCmd::new(Route::Authentication, self.redirect_delay)),
            ]),
            OrderRequest::DialogOpened => {
                // Mounted only for a session; the service must be one we rendered.
                self.order_dialog = self.controller.order_dialog_props().and_then(|props| {
                    let service = self.controller.service(props.service_id.as_deref()?)?;
                    Some(OrderDialog::new(
                        service.clone(),
                        props.customer_id,
                        self.resolver.clone(),
                    ))
                });
                if self.order_dialog.is_none() {
                    debug!(service = service_id, "Order dialog not mounted");
                    self.controller.close_dialog();
                }
                ScreenMsg::Idle
            }
        }
    }

    fn active_dialog(&mut self) -> Option<&mut OrderDialog> {
        if self.controller.is_dialog_open() {
            self.order_dialog.as_mut()
        } else {
            None
        }
    }

    /// Unmount the dialog once the session behind it is gone.
    ///
    /// Returns whether a dialog is still mounted.
    fn check_dialog_session(&mut self) -> bool {
        if self.active_dialog().is_none() {
            return false;
        }
        if self.controller.order_dialog_props().is_some() {
            return true;
        }
        info!("Session ended, closing the order dialog");
        self.controller.close_dialog();
        self.order_dialog = None;
        false
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> Option<EventResult<()>> {
        if !self.check_dialog_session() {
            return None;
        }
        let dialog = self.active_dialog()?;
        match dialog.handle_key(key) {
            Ok(EventResult::Event(OrderEvent::Submitted(draft))) => {
                self.queue(CatalogMsg::SubmitOrder(draft));
                self.queue(CatalogMsg::CloseDialog);
            }
            Ok(EventResult::Event(OrderEvent::Cancelled)) => self.queue(CatalogMsg::CloseDialog),
            Ok(EventResult::Consumed | EventResult::Ignored) => {}
            Err(e) => debug!("Order dialog failed to handle key: {e}"),
        }
        // The dialog captures everything while open.
        Some(EventResult::Consumed)
    }

    fn service_count(&self, category: usize) -> usize {
        self.controller
            .categories()
            .get(category)
            .map_or(0, |c| c.services.len())
    }

    fn select_in_focus(&self, target: impl FnOnce(usize, usize) -> usize) {
        let count = self.service_count(self.focus);
        if count == 0 {
            return;
        }
        let current = self.controller.selection().selected(self.focus).unwrap_or(0);
        self.queue(CatalogMsg::SelectService {
            category: self.focus,
            service: target(current, count),
        });
    }

    fn focused_category(&self) -> Option<&ServiceCategory> {
        self.controller.categories().get(self.focus)
    }

    /// Rows one category needs at `width`, description wrapped in full.
    fn section_height(&self, index: usize, width: u16) -> u16 {
        self.controller.detail(index).map_or(HEADER_HEIGHT, |service| {
            let text_width = width.saturating_sub(2 * DETAIL_INDENT);
            let lines = description(service).line_count(text_width).max(1);
            DETAIL_CHROME.saturating_add(u16::try_from(lines).unwrap_or(u16::MAX))
        })
    }

    fn render_catalog(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut block = Block::default()
            .title(" Services ")
            .title_style(Style::default().fg(theme.pink()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));
        if let Some(address) = &self.address {
            block = block.title_bottom(
                Line::styled(format!(" {address} "), Style::default().fg(theme.overlay1()))
                    .right_aligned(),
            );
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let categories = self.controller.categories();
        if categories.is_empty() || inner.height == 0 {
            return;
        }

        let heights: Vec<u16> = (0..categories.len())
            .map(|index| self.section_height(index, inner.width))
            .collect();

        // Keep the focused section on the page: start no later than the focus,
        // and late enough that everything up to the focus fits.
        self.scroll = self.scroll.min(self.focus);
        while self.scroll < self.focus
            && heights[self.scroll..=self.focus]
                .iter()
                .map(|&h| u32::from(h))
                .sum::<u32>()
                > u32::from(inner.height)
        {
            self.scroll += 1;
        }

        let mut y = inner.y;
        for (index, category) in categories.iter().enumerate().skip(self.scroll) {
            let remaining = inner.bottom().saturating_sub(y);
            // Partial sections are left out, unless even the first one is taller than the page.
            if remaining == 0 || (heights[index] > remaining && index != self.scroll) {
                break;
            }
            let section = Rect::new(inner.x, y, inner.width, heights[index].min(remaining));
            self.render_section(frame, section, theme, index, category);
            y = y.saturating_add(heights[index]);
        }
    }

    fn render_section(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        index: usize,
        category: &ServiceCategory,
    ) {
        let focused = index == self.focus;
        let [rule, title, strip, detail] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);

        if index != 0 {
            frame.render_widget(
                Paragraph::new("─".repeat(rule.width as usize))
                    .style(Style::default().fg(theme.surface2())),
                rule,
            );
        }

        let marker = if focused { "▶ " } else { "  " };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.lavender())),
                Span::styled(
                    category.name.clone(),
                    Style::default().fg(theme.text()).add_modifier(Modifier::BOLD),
                ),
            ])),
            title,
        );

        let selected = self.controller.selection().selected(index);
        let strip_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if focused {
                theme.lavender()
            } else {
                theme.surface1()
            }))
            .style(Style::default().bg(theme.surface0()));
        let strip_inner = strip_block.inner(strip);
        frame.render_widget(strip_block, strip);
        frame.render_widget(
            Paragraph::new(service_strip(
                &category.services,
                selected,
                strip_inner.width as usize,
                theme,
            )),
            strip_inner,
        );

        // Nothing below the strip unless the selection resolves to a real service.
        let Some(service) = self.controller.detail(index) else {
            return;
        };

        let [name, price, text, button] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(detail);

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("  {}", service.name),
                Style::default().fg(theme.pink()).add_modifier(Modifier::BOLD),
            )),
            name,
        );
        frame.render_widget(Paragraph::new(price_line(service, theme)), price);
        frame.render_widget(
            description(service).style(Style::default().fg(theme.subtext1())),
            text.inner(Margin::new(DETAIL_INDENT, 0)),
        );

        let mut button_line = vec![
            Span::raw("  "),
            Span::styled(
                " Order now ",
                Style::default()
                    .fg(theme.base())
                    .bg(theme.pink())
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if focused {
            button_line.push(Span::styled(
                format!("  {}", self.resolver.display_catalog(CatalogAction::Order)),
                Style::default().fg(theme.overlay1()),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(button_line)), button);
    }
}

/// One line of service buttons, scrolled so the selected one is visible.
fn service_strip(
    services: &[Service],
    selected: Option<usize>,
    width: usize,
    theme: &Theme,
) -> Line<'static> {
    let labels: Vec<String> = services.iter().map(|s| format!(" {} ", s.name)).collect();
    let gap = BUTTON_GAP.chars().count();

    // Drop leading buttons until everything up to the selected one fits.
    let mut first = 0;
    if let Some(selected) = selected.filter(|&s| s < labels.len()) {
        let span_width = |from: usize| -> usize {
            labels[from..=selected]
                .iter()
                .map(|l| l.chars().count() + gap)
                .sum::<usize>()
                + usize::from(from > 0) * gap
        };
        while first < selected && span_width(first) > width {
            first += 1;
        }
    }

    let mut spans = Vec::new();
    if first > 0 {
        spans.push(Span::styled("‹ ", Style::default().fg(theme.overlay1())));
    }
    for (index, label) in labels.into_iter().enumerate().skip(first) {
        let style = if Some(index) == selected {
            Style::default()
                .fg(theme.base())
                .bg(theme.pink())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.pink())
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(BUTTON_GAP));
    }
    Line::from(spans)
}

fn description(service: &Service) -> Paragraph<'static> {
    Paragraph::new(service.description.clone()).wrap(Wrap { trim: true })
}

/// `Rp7.000 / kg` followed by the estimate when there is one.
fn price_line(service: &Service, theme: &Theme) -> Line<'static> {
    let mut spans = vec![
        Span::raw("  "),
        Span::styled(
            format!("{} / {}", format_rupiah(service.price), service.unit),
            Style::default().fg(theme.green()).add_modifier(Modifier::BOLD),
        ),
    ];
    if service.has_duration() {
        spans.push(Span::styled(
            format!("    Estimate ({})", service.estimated_duration),
            Style::default().fg(theme.subtext0()),
        ));
    }
    Line::from(spans)
}

impl Screen for CatalogScreen {
    fn init(&mut self) {
        self.queue(CatalogMsg::Mount);
    }

    fn handle_tick(&mut self) {
        if self.controller.is_loading() {
            self.spinner.handle_tick();
        }
        self.check_dialog_session();
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        // Nothing but the placeholder exists while loading.
        if self.controller.is_loading() {
            return EventResult::Ignored;
        }

        if let Some(result) = self.handle_dialog_key(key) {
            return result;
        }

        let category_count = self.controller.categories().len();
        let r = self.resolver.clone();

        if r.matches_nav(&key, NavAction::Down) {
            if self.focus + 1 < category_count {
                self.focus += 1;
            }
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Up) {
            self.focus = self.focus.saturating_sub(1);
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Right) {
            self.select_in_focus(|current, count| (current + 1).min(count - 1));
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Left) {
            self.select_in_focus(|current, _| current.saturating_sub(1));
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Home) {
            self.select_in_focus(|_, _| 0);
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::End) {
            self.select_in_focus(|_, count| count - 1);
            return EventResult::Consumed;
        }
        if r.matches_catalog(&key, CatalogAction::Order) {
            if let Some(service) = self.controller.detail(self.focus) {
                self.queue(CatalogMsg::RequestOrder(service.id.clone()));
            }
            // The order key never reaches the global handlers.
            return EventResult::Consumed;
        }

        EventResult::Ignored
    }

    fn update(&mut self) -> Result<ScreenMsg> {
        let mut commands: Vec<Box<dyn Command>> = Vec::new();

        while let Ok(msg) = self.msg_rx.try_recv() {
            match self.process_message(msg) {
                ScreenMsg::Idle => {}
                ScreenMsg::Run(cmds) => commands.extend(cmds),
            }
        }

        Ok(if commands.is_empty() {
            ScreenMsg::Idle
        } else {
            ScreenMsg::Run(commands)
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if self.controller.is_loading() {
            self.spinner.render(frame, area, theme);
            return;
        }

        self.render_catalog(frame, area, theme);

        if self.check_dialog_session()
            && let Some(dialog) = self.order_dialog.as_mut()
        {
            dialog.render(frame, area, theme);
        }
    }

    fn breadcrumbs(&self) -> Vec<String> {
        let mut bc = vec!["Services".to_string()];
        if let Some(category) = self.focused_category() {
            bc.push(category.name.clone());
        }
        bc
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        if self.controller.is_dialog_open() && self.order_dialog.is_some() {
            return vec![
                Keybinding::new(r.display_dialog(DialogAction::Confirm), "Place order"),
                Keybinding::new(r.display_dialog(DialogAction::Cancel), "Cancel"),
                Keybinding::new(
                    format!(
                        "{}/{}",
                        r.display_dialog(DialogAction::Decrease),
                        r.display_dialog(DialogAction::Increase)
                    ),
                    "Quantity",
                ),
            ];
        }
        if self.controller.is_loading() {
            return vec![];
        }
        vec![
            Keybinding::new(r.display_catalog(CatalogAction::Order), "Order"),
            Keybinding::new(
                format!(
                    "{}/{}",
                    r.display_nav(NavAction::Left),
                    r.display_nav(NavAction::Right)
                ),
                "Service",
            ),
            Keybinding::new(
                format!("{}/{}", r.display_nav(NavAction::Up), r.display_nav(NavAction::Down)),
                "Category",
            ),
            Keybinding::new(
                format!("{}/{}", r.display_nav(NavAction::Home), r.display_nav(NavAction::End)),
                "First/last",
            ),
        ]
    }
}
