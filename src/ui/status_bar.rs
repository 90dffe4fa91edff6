use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::Theme;
use crate::config::{GlobalAction, KeyResolver};
use crate::session::Session;
use crate::ui::Keybinding;

/// ASCII art logo for the status bar.
const LOGO: &[&str] = &[
    r"   _____    ",
    r"  |  o  |   ",
    r"  | (~) |   ",
    r"  |_____|   ",
    r" lazybooking",
];

/// Bottom panel: who is browsing, where from, and the available keys.
pub struct StatusBar {
    session: Option<Session>,
    endpoint: String,
    breadcrumbs: Vec<String>,
    resolver: Arc<KeyResolver>,
}

impl StatusBar {
    pub fn new(endpoint: impl Into<String>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            session: None,
            endpoint: endpoint.into(),
            breadcrumbs: Vec::new(),
            resolver,
        }
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    pub fn set_breadcrumbs(&mut self, breadcrumbs: Vec<String>) {
        self.breadcrumbs = breadcrumbs;
    }

    pub fn render_with_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        local_keybindings: &[Keybinding],
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.surface1()));

        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(36), // visitor + backend
                Constraint::Min(20),    // key hints
                Constraint::Length(13), // logo
            ])
            .split(inner_area);

        self.render_status_info(frame, chunks[0], theme);
        self.render_keybindings(frame, chunks[1], theme, local_keybindings);
        Self::render_logo(frame, chunks[2], theme);
    }

    fn render_status_info(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let w = area.width as usize;
        let label_style = Style::default().fg(theme.overlay1());
        let value_style = Style::default().fg(theme.text());

        let (visitor, visitor_style) = self.session.as_ref().map_or_else(
            || ("Guest".to_string(), Style::default().fg(theme.overlay0())),
            |session| {
                (
                    session.display_name().to_string(),
                    Style::default().fg(theme.pink()),
                )
            },
        );

        let lines = vec![
            Line::from(Span::styled(
                truncate_str(&self.breadcrumbs.join(" › "), w),
                Style::default()
                    .fg(theme.lavender())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            status_line("visitor", &visitor, w, label_style, visitor_style.add_modifier(Modifier::BOLD)),
            status_line("backend", &self.endpoint, w, label_style, value_style),
        ];

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_keybindings(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        local_keybindings: &[Keybinding],
    ) {
        let global_keybindings = self.global_keybindings();

        let hints: Vec<&Keybinding> = local_keybindings
            .iter()
            .chain(global_keybindings.iter())
            .collect();

        if hints.is_empty() || area.height == 0 {
            return;
        }

        // Column widths come from the content so the separators line up.
        let max_key_w = hints.iter().map(|kb| kb.key.chars().count()).max().unwrap_or(1);
        let max_desc_w = hints
            .iter()
            .map(|kb| kb.description.chars().count())
            .max()
            .unwrap_or(1);
        let col_width = u16::try_from(max_key_w + 3 + max_desc_w + 2).unwrap_or(u16::MAX);
        let num_cols = (area.width / col_width).max(1) as usize;
        let num_rows = area.height as usize;

        let mut columns: Vec<Vec<Line>> = vec![Vec::new(); num_cols];
        for (i, kb) in hints.iter().enumerate() {
            let col_idx = i / num_rows;
            if col_idx >= num_cols {
                break;
            }

            columns[col_idx].push(Line::from(vec![
                Span::styled(
                    format!("{:>width$}", kb.key, width = max_key_w),
                    Style::default().fg(theme.peach()),
                ),
                Span::styled(" │ ", Style::default().fg(theme.surface2())),
                Span::styled(kb.description.clone(), Style::default().fg(theme.subtext0())),
            ]));
        }

        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(col_width); num_cols])
            .split(area);

        for (col_lines, col_area) in columns.into_iter().zip(col_areas.iter()) {
            frame.render_widget(Paragraph::new(col_lines), *col_area);
        }
    }

    fn render_logo(frame: &mut Frame, area: Rect, theme: &Theme) {
        let logo_lines: Vec<Line> = LOGO
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    *line,
                    Style::default().fg(theme.pink()).add_modifier(Modifier::BOLD),
                ))
            })
            .collect();

        frame.render_widget(Paragraph::new(logo_lines), area);
    }

    pub fn global_keybindings(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::new(self.resolver.display_global(GlobalAction::Back), "Back"),
            Keybinding::new(self.resolver.display_global(GlobalAction::Quit), "Quit"),
            Keybinding::new(self.resolver.display_global(GlobalAction::Suspend), "Suspend"),
        ]
    }
}

/// Render a labelled status line: right-aligned label, then value.
fn status_line<'a>(
    label: &'a str,
    value: &str,
    max_width: usize,
    label_style: Style,
    value_style: Style,
) -> Line<'a> {
    const LABEL_W: usize = 8;
    let available = max_width.saturating_sub(LABEL_W + 1);
    Line::from(vec![
        Span::styled(format!("{label:>LABEL_W$}"), label_style),
        Span::raw(" "),
        Span::styled(truncate_str(value, available), value_style),
    ])
}

/// Truncate to `max_width` characters, ending with "..." when cut.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(bar: &StatusBar, local: &[Keybinding]) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 7)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| bar.render_with_keybindings(frame, frame.area(), &theme, local))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_every_binding_is_shown() {
        let bar = StatusBar::new("localhost:1337", Arc::new(KeyResolver::default()));
        let local = [
            Keybinding::new("Enter/o", "Order"),
            Keybinding::new("h/←/l/→", "Service"),
            Keybinding::new("k/↑/j/↓", "Category"),
            Keybinding::new("g/Home/G/End", "First/last"),
        ];
        let text = rendered(&bar, &local);

        assert!(text.contains("First/last"));
        assert!(text.contains("ctrl+z"));
        assert!(text.contains("Suspend"));
        assert!(text.contains("Guest"));
    }

    #[test]
    fn test_truncate_str_counts_characters() {
        assert_eq!(truncate_str("Setrika", 10), "Setrika");
        assert_eq!(truncate_str("Cuci Kering Lipat", 10), "Cuci Ke...");
        assert_eq!(truncate_str("Layanan › Cuci", 3), "Lay");
    }
}
