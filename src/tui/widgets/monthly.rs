//! Monthly view widget - spend per month as horizontal bars

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::overview::format_currency;
use super::tabs::{Tab, TabBar};
use super::{render_keybindings, render_separator};
use crate::tui::theme::Theme;

/// Format a bar proportional to `value / max`
/// Example: value=500, max=1000, width=8 → "▓▓▓▓░░░░"
pub fn format_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || width == 0 || !value.is_finite() {
        return "░".repeat(width);
    }
    let ratio = (value / max).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("{}{}", "▓".repeat(filled), "░".repeat(width - filled))
}

const MAX_CONTENT_WIDTH: u16 = 120;

/// Month(10) + Spend(14) + gap(2) + Bar(40) = 66
const TABLE_WIDTH: u16 = 66;
const BAR_WIDTH: usize = 40;

/// Months kept on screen when scrolling (one year)
pub const VISIBLE_MONTHS: usize = 12;

pub struct MonthlyView<'a> {
    /// (YYYY-MM, amount) in chronological order
    trend: &'a [(String, f64)],
    scroll: usize,
    tabs: TabBar,
    theme: Theme,
}

impl<'a> MonthlyView<'a> {
    pub fn new(trend: &'a [(String, f64)], scroll: usize, theme: Theme) -> Self {
        Self {
            trend,
            scroll,
            tabs: TabBar::new(Tab::Monthly, theme),
            theme,
        }
    }

    pub fn with_tabs(mut self, tabs: TabBar) -> Self {
        self.tabs = tabs;
        self
    }

    /// Largest scroll offset that still fills `visible_rows`
    pub fn max_scroll_offset(rows: usize, visible_rows: usize) -> usize {
        rows.saturating_sub(visible_rows)
    }
}

impl Widget for MonthlyView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Top padding
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Rows
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Keybindings
        ])
        .split(centered_area);

        self.tabs.render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);
        self.render_header(chunks[3], buf);
        self.render_rows(chunks[4], buf);
        render_separator(chunks[5], buf, self.theme);
        render_keybindings(chunks[6], buf, self.theme);
    }
}

impl MonthlyView<'_> {
    fn table_rect(&self, area: Rect, y: u16) -> Rect {
        let offset = area.width.saturating_sub(TABLE_WIDTH) / 2;
        Rect {
            x: area.x + offset,
            y,
            width: TABLE_WIDTH.min(area.width),
            height: 1,
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:<10}", "Month"), bold),
            Span::styled(format!("{:>14}", "Spent"), bold),
            Span::raw("  "),
            Span::styled("Trend", bold),
        ]))
        .alignment(Alignment::Left)
        .render(self.table_rect(area, area.y), buf);
    }

    fn render_rows(&self, area: Rect, buf: &mut Buffer) {
        if self.trend.is_empty() {
            Paragraph::new(Span::styled(
                "No paid orders in this range.",
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let max = self
            .trend
            .iter()
            .map(|(_, amount)| *amount)
            .fold(0.0_f64, f64::max);

        let visible = self
            .trend
            .iter()
            .skip(self.scroll)
            .take(area.height as usize);

        for (i, (month, amount)) in visible.enumerate() {
            let row = Line::from(vec![
                Span::styled(format!("{:<10}", month), Style::default().fg(self.theme.date())),
                Span::styled(
                    format!("{:>14}", format_currency(*amount)),
                    Style::default().fg(self.theme.cost()),
                ),
                Span::raw("  "),
                Span::styled(
                    format_bar(*amount, max, BAR_WIDTH),
                    Style::default().fg(self.theme.bar()),
                ),
            ]);
            Paragraph::new(row)
                .alignment(Alignment::Left)
                .render(self.table_rect(area, area.y + i as u16), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(500.0, 1000.0, 8), "▓▓▓▓░░░░");
        assert_eq!(format_bar(1000.0, 1000.0, 4), "▓▓▓▓");
        assert_eq!(format_bar(0.0, 1000.0, 4), "░░░░");
    }

    #[test]
    fn test_format_bar_zero_max() {
        assert_eq!(format_bar(10.0, 0.0, 3), "░░░");
    }

    #[test]
    fn test_format_bar_clamps_overflow() {
        assert_eq!(format_bar(2000.0, 1000.0, 4), "▓▓▓▓");
    }

    #[test]
    fn test_max_scroll_offset() {
        assert_eq!(MonthlyView::max_scroll_offset(30, 10), 20);
        assert_eq!(MonthlyView::max_scroll_offset(5, 10), 0);
    }

    #[test]
    fn test_renders_rows() {
        let trend = vec![
            ("2024-01".to_string(), 1200.0),
            ("2024-02".to_string(), 600.0),
        ];
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        MonthlyView::new(&trend, 0, Theme::Dark).render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        assert!(text.contains("2024-01"));
        assert!(text.contains("₹1,200"));
    }
}
