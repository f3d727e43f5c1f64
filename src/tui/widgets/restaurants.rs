//! Restaurants view widget - ranked table and spending breakdown

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::overview::{format_currency, format_number};
use super::tabs::{Tab, TabBar};
use super::{render_keybindings, render_separator};
use crate::tui::theme::Theme;
use crate::types::{CategorySlice, RankedRestaurant, TOP_RESTAURANTS};

/// Format a percentage bar with filled/empty blocks
/// Example: 50.0% with width 10 → "█████░░░░░"
pub fn format_percentage_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Data for the restaurants view
#[derive(Debug)]
pub struct RestaurantsData<'a> {
    /// Sorted by amount descending, at most ten rows
    pub ranked: &'a [RankedRestaurant],
    pub breakdown: &'a [CategorySlice],
    /// Denominator for breakdown percentages
    pub total_spent: f64,
}

const MAX_CONTENT_WIDTH: u16 = 120;

/// Rank(4) + Restaurant(32) + Orders(8) + Spent(14) = 58
const TABLE_WIDTH: u16 = 58;

/// Label(32) + Spent(14) + Pct(8) + gap(2) + Bar(16) = 72
const BREAKDOWN_WIDTH: u16 = 72;
const BREAKDOWN_BAR_WIDTH: usize = 16;

pub struct RestaurantsView<'a> {
    data: RestaurantsData<'a>,
    tabs: TabBar,
    theme: Theme,
}

impl<'a> RestaurantsView<'a> {
    pub fn new(data: RestaurantsData<'a>, theme: Theme) -> Self {
        Self {
            data,
            tabs: TabBar::new(Tab::Restaurants, theme),
            theme,
        }
    }

    pub fn with_tabs(mut self, tabs: TabBar) -> Self {
        self.tabs = tabs;
        self
    }
}

impl Widget for RestaurantsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let ranked_rows = self.data.ranked.len().clamp(1, TOP_RESTAURANTS) as u16;
        let breakdown_rows = self.data.breakdown.len().max(1) as u16;

        let chunks = Layout::vertical([
            Constraint::Length(1),              // Top padding
            Constraint::Length(1),              // Tabs
            Constraint::Length(1),              // Separator
            Constraint::Length(1),              // Table header
            Constraint::Length(ranked_rows),    // Ranked rows
            Constraint::Length(1),              // Blank
            Constraint::Length(1),              // Breakdown header
            Constraint::Length(breakdown_rows), // Breakdown rows
            Constraint::Length(1),              // Separator
            Constraint::Length(1),              // Keybindings
            Constraint::Min(0),
        ])
        .split(centered_area);

        self.tabs.render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);
        self.render_table_header(chunks[3], buf);
        self.render_ranked(chunks[4], buf);
        self.render_breakdown_header(chunks[6], buf);
        self.render_breakdown(chunks[7], buf);
        render_separator(chunks[8], buf, self.theme);
        render_keybindings(chunks[9], buf, self.theme);
    }
}

impl RestaurantsView<'_> {
    fn centered_row(area: Rect, y: u16, width: u16) -> Rect {
        let offset = area.width.saturating_sub(width) / 2;
        Rect {
            x: area.x + offset,
            y,
            width: width.min(area.width),
            height: 1,
        }
    }

    fn header_style(&self) -> Style {
        Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD)
    }

    fn render_table_header(&self, area: Rect, buf: &mut Buffer) {
        let bold = self.header_style();
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:>3} ", "#"), bold),
            Span::styled(format!("{:<32}", "Restaurant"), bold),
            Span::styled(format!("{:>8}", "Orders"), bold),
            Span::styled(format!("{:>14}", "Spent"), bold),
        ]))
        .render(Self::centered_row(area, area.y, TABLE_WIDTH), buf);
    }

    fn render_ranked(&self, area: Rect, buf: &mut Buffer) {
        if self.data.ranked.is_empty() {
            Paragraph::new(Span::styled(
                "No paid orders in this range.",
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        for (i, restaurant) in self
            .data
            .ranked
            .iter()
            .take(area.height as usize)
            .enumerate()
        {
            let row = Line::from(vec![
                Span::styled(
                    format!("{:>3} ", i + 1),
                    Style::default().fg(self.theme.muted()),
                ),
                Span::styled(
                    format!("{:<32}", truncate_name(&restaurant.name, 30)),
                    Style::default().fg(self.theme.accent()),
                ),
                Span::styled(
                    format!("{:>8}", format_number(restaurant.count)),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:>14}", format_currency(restaurant.amount)),
                    Style::default().fg(self.theme.cost()),
                ),
            ]);
            Paragraph::new(row).render(
                Self::centered_row(area, area.y + i as u16, TABLE_WIDTH),
                buf,
            );
        }
    }

    fn render_breakdown_header(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            "Spending Breakdown",
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        )))
        .render(Self::centered_row(area, area.y, BREAKDOWN_WIDTH), buf);
    }

    fn render_breakdown(&self, area: Rect, buf: &mut Buffer) {
        for (i, slice) in self
            .data
            .breakdown
            .iter()
            .take(area.height as usize)
            .enumerate()
        {
            let percent = if self.data.total_spent > 0.0 {
                slice.amount / self.data.total_spent * 100.0
            } else {
                0.0
            };
            let row = Line::from(vec![
                Span::styled(
                    format!("{:<32}", truncate_name(&slice.label, 30)),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:>14}", format_currency(slice.amount)),
                    Style::default().fg(self.theme.cost()),
                ),
                Span::styled(
                    format!("{:>7.1}%", percent),
                    Style::default().fg(self.theme.muted()),
                ),
                Span::raw("  "),
                Span::styled(
                    format_percentage_bar(percent, BREAKDOWN_BAR_WIDTH),
                    Style::default().fg(self.theme.bar()),
                ),
            ]);
            Paragraph::new(row).render(
                Self::centered_row(area, area.y + i as u16, BREAKDOWN_WIDTH),
                buf,
            );
        }
    }
}

/// Truncate to `max` characters (UTF-8 safe), marking the cut with "…"
fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        format!("{}…", name.chars().take(max - 1).collect::<String>())
    } else {
        name.to_string()
    }
}
