use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::Theme;
use crate::catalog::currency::format_rupiah;
use crate::catalog::model::Service;
use crate::client::OrderDraft;
use crate::config::{DialogAction, KeyResolver};
use crate::ui::{EventResult, Modal, Result};

#[derive(Debug, PartialEq, Eq)]
pub enum OrderEvent {
    Submitted(OrderDraft),
    Cancelled,
}

/// Confirms an order for one service on behalf of the logged-in customer.
pub struct OrderDialog {
    service: Service,
    customer_id: String,
    quantity: u32,
    resolver: Arc<KeyResolver>,
}

impl OrderDialog {
    pub fn new(service: Service, customer_id: impl Into<String>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            service,
            customer_id: customer_id.into(),
            quantity: 1,
            resolver,
        }
    }

    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total(&self) -> i64 {
        self.service.price.saturating_mul(i64::from(self.quantity))
    }

    fn draft(&self) -> OrderDraft {
        OrderDraft {
            service_id: self.service.id.clone(),
            customer_id: self.customer_id.clone(),
            quantity: self.quantity,
        }
    }
}

impl Modal for OrderDialog {
    type Output = OrderEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_dialog(&key, DialogAction::Confirm) {
            return Ok(OrderEvent::Submitted(self.draft()).into());
        }
        if self.resolver.matches_dialog(&key, DialogAction::Cancel) {
            return Ok(OrderEvent::Cancelled.into());
        }
        if self.resolver.matches_dialog(&key, DialogAction::Increase) {
            self.quantity = self.quantity.saturating_add(1);
        } else if self.resolver.matches_dialog(&key, DialogAction::Decrease) {
            self.quantity = self.quantity.saturating_sub(1).max(1);
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(50), Constraint::Length(11));

        frame.render_widget(Clear, popup_area);

        let label_style = Style::default().fg(theme.overlay1());
        let value_style = Style::default().fg(theme.text());
        let key_style = Style::default().fg(theme.peach()).add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.service.name.clone(),
                Style::default().fg(theme.pink()).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Price     ", label_style),
                Span::styled(
                    format!("{} / {}", format_rupiah(self.service.price), self.service.unit),
                    value_style,
                ),
            ]),
            Line::from(vec![
                Span::styled("Quantity  ", label_style),
                Span::styled("‹ ", key_style),
                Span::styled(format!("{} {}", self.quantity, self.service.unit), value_style),
                Span::styled(" ›", key_style),
            ]),
            Line::from(vec![
                Span::styled("Total     ", label_style),
                Span::styled(
                    format_rupiah(self.total()),
                    Style::default().fg(theme.green()).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("[{}]", self.resolver.display_dialog(DialogAction::Confirm)), key_style),
                Span::raw(" "),
                Span::styled("Order", Style::default().fg(theme.green()).add_modifier(Modifier::BOLD)),
                Span::raw("    "),
                Span::styled(format!("[{}]", self.resolver.display_dialog(DialogAction::Cancel)), key_style),
                Span::raw(" "),
                Span::styled("Cancel", Style::default().fg(theme.overlay1()).add_modifier(Modifier::BOLD)),
            ]),
        ];

        let block = Block::default()
            .title(format!(" {} ", self.title().unwrap_or_default()))
            .title_style(Style::default().fg(theme.mauve()).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.pink()))
            .style(Style::default().bg(theme.base()));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, popup_area);
    }

    fn title(&self) -> Option<&str> {
        Some("New order")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::controller::tests::service;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(dialog: &mut OrderDialog, code: KeyCode) -> EventResult<OrderEvent> {
        dialog
            .handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn dialog() -> OrderDialog {
        OrderDialog::new(service("svc-1", 7000), "cust-1", Arc::new(KeyResolver::default()))
    }

    #[test]
    fn test_quantity_never_drops_below_one() {
        let mut dialog = dialog();
        press(&mut dialog, KeyCode::Char('-'));
        press(&mut dialog, KeyCode::Left);
        assert_eq!(dialog.quantity(), 1);

        press(&mut dialog, KeyCode::Char('+'));
        press(&mut dialog, KeyCode::Right);
        assert_eq!(dialog.quantity(), 3);
        assert_eq!(dialog.total(), 21_000);
    }

    #[test]
    fn test_confirm_submits_draft_for_customer() {
        let mut dialog = dialog();
        press(&mut dialog, KeyCode::Char('+'));

        let result = press(&mut dialog, KeyCode::Enter);
        assert_eq!(
            result,
            EventResult::Event(OrderEvent::Submitted(OrderDraft {
                service_id: "svc-1".to_string(),
                customer_id: "cust-1".to_string(),
                quantity: 2,
            }))
        );
    }

    #[test]
    fn test_cancel_and_swallow_other_keys() {
        let mut dialog = dialog();
        assert_eq!(press(&mut dialog, KeyCode::Char('x')), EventResult::Consumed);
        assert_eq!(
            press(&mut dialog, KeyCode::Esc),
            EventResult::Event(OrderEvent::Cancelled)
        );
    }
}
