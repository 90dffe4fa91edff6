use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::ui::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    message: String,
    toast_type: ToastType,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn toast_type(&self) -> ToastType {
        self.toast_type
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

/// Stack of transient notifications in the bottom-right corner.
pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastManager {
    pub const fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 3,
        }
    }

    pub fn show(&mut self, toast: Toast) {
        self.toasts.push_back(toast);
        while self.toasts.len() > self.max_visible {
            self.toasts.pop_front();
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }
}

impl Component for ToastManager {
    type Output = ();

    fn handle_tick(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let toast_height = 4u16;
        let toast_width = 56u16.min(area.width.saturating_sub(4));
        let spacing = 1u16;

        // Newest toast sits at the bottom, older ones stack upward
        for (i, toast) in self.toasts.iter().rev().enumerate() {
            let offset = u16::try_from(i).unwrap_or(u16::MAX).saturating_mul(toast_height + spacing);
            let Some(y) = (area.y + area.height).checked_sub(toast_height + offset + 1) else {
                break;
            };
            if y < area.y {
                break;
            }
            let x = area.x + area.width.saturating_sub(toast_width + 2);
            let toast_area = Rect::new(x, y, toast_width, toast_height);

            let (border_color, icon) = match toast.toast_type {
                ToastType::Success => (theme.green(), "✓"),
                ToastType::Info => (theme.blue(), "ℹ"),
                ToastType::Error => (theme.red(), "✗"),
            };

            frame.render_widget(Clear, toast_area);

            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(border_color))
                .style(Style::default().bg(theme.surface0()));

            let paragraph = Paragraph::new(format!("{icon} {}", toast.message))
                .block(block)
                .style(Style::default().fg(theme.text()).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });

            frame.render_widget(paragraph, toast_area);
        }
    }
}
