//! Overview widget - headline spending numbers in a card grid

use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::hours::hour_label;
use super::tabs::{Tab, TabBar};
use super::{render_keybindings, render_separator};
use crate::tui::theme::Theme;
use crate::types::MetricsSnapshot;

/// Currency symbol for every displayed amount
pub const CURRENCY: &str = "₹";

/// Format a number with thousand separators (e.g., 1234567 -> "1,234,567")
/// Optimized: no Vec<char> allocation since digits are ASCII
pub fn format_number(n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Format an amount as rounded rupees (e.g., 1234.56 -> "₹1,235")
pub fn format_currency(amount: f64) -> String {
    let rounded = if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    };
    format!("{}{}", CURRENCY, format_number(rounded))
}

/// Data for the overview display (references to avoid cloning)
#[derive(Debug)]
pub struct OverviewData<'a> {
    pub metrics: &'a MetricsSnapshot,
    pub range_label: &'a str,
    pub last_synced: DateTime<Utc>,
}

/// Maximum content width (keeps layout clean on wide terminals)
const MAX_CONTENT_WIDTH: u16 = 120;

const CARD_WIDTH: u16 = 28;
const CARD_HEIGHT: u16 = 5;

/// Fixed number of columns for a balanced 2x3 grid
const FIXED_COLS: usize = 3;

/// Cards per row for the available width (max 3 for a balanced grid)
fn cards_per_row(width: u16) -> usize {
    let usable_width = width.saturating_sub(4);
    let cards = (usable_width / (CARD_WIDTH + 2)) as usize;
    cards.clamp(1, FIXED_COLS)
}

pub struct Overview<'a> {
    data: OverviewData<'a>,
    tabs: TabBar,
    theme: Theme,
}

impl<'a> Overview<'a> {
    pub fn new(data: OverviewData<'a>, theme: Theme) -> Self {
        Self {
            data,
            tabs: TabBar::new(Tab::Overview, theme),
            theme,
        }
    }

    pub fn with_tabs(mut self, tabs: TabBar) -> Self {
        self.tabs = tabs;
        self
    }
}

impl Widget for Overview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let cards = self.build_cards();
        let cols = cards_per_row(centered_area.width);
        let rows = cards.len().div_ceil(cols);
        let grid_height = (rows as u16) * (CARD_HEIGHT + 1);

        let chunks = Layout::vertical([
            Constraint::Length(1),           // Top padding
            Constraint::Length(1),           // Tabs
            Constraint::Length(1),           // Separator
            Constraint::Length(1),           // Title
            Constraint::Length(1),           // Range
            Constraint::Length(1),           // Blank
            Constraint::Length(grid_height), // Card grid
            Constraint::Length(1),           // Separator
            Constraint::Length(1),           // Keybindings
            Constraint::Min(0),
        ])
        .split(centered_area);

        self.tabs.render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);
        self.render_title(chunks[3], buf);
        self.render_range(chunks[4], buf);
        self.render_card_grid(chunks[6], buf, &cards, cols);
        render_separator(chunks[7], buf, self.theme);
        render_keybindings(chunks[8], buf, self.theme);
    }
}

impl Overview<'_> {
    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            "Spending Overview",
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn render_range(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(vec![
            Span::styled(self.data.range_label, Style::default().fg(self.theme.date())),
            Span::styled("  (f: change range)", Style::default().fg(self.theme.muted())),
        ]))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn build_cards(&self) -> Vec<StatCard> {
        let m = self.data.metrics;
        let top = m
            .top_restaurants(1)
            .into_iter()
            .next()
            .map(|r| r.name)
            .unwrap_or_else(|| "N/A".to_string());
        let peak = m
            .peak_hour()
            .map(hour_label)
            .unwrap_or_else(|| "N/A".to_string());
        let synced = self
            .data
            .last_synced
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        vec![
            StatCard {
                title: "Total Spent",
                value: format_currency(m.total_spent),
                color: self.theme.stat_warm(),
            },
            StatCard {
                title: "Orders",
                value: format_number(m.total_orders),
                color: self.theme.accent(),
            },
            StatCard {
                title: "Avg Order Value",
                value: format_currency(m.avg_order_value),
                color: self.theme.cost(),
            },
            StatCard {
                title: "Top Restaurant",
                value: top,
                color: self.theme.bar(),
            },
            StatCard {
                title: "Peak Hour",
                value: peak,
                color: self.theme.stat_blue(),
            },
            StatCard {
                title: "Last Synced",
                value: synced,
                color: self.theme.date(),
            },
        ]
    }

    fn render_card_grid(&self, area: Rect, buf: &mut Buffer, cards: &[StatCard], cols: usize) {
        let total_cards_width = (cols as u16) * CARD_WIDTH + ((cols - 1) as u16) * 2;
        let start_x = area.x + (area.width.saturating_sub(total_cards_width)) / 2;

        for (i, card) in cards.iter().enumerate() {
            let row = i / cols;
            let col = i % cols;

            let card_area = Rect {
                x: start_x + (col as u16) * (CARD_WIDTH + 2),
                y: area.y + (row as u16) * (CARD_HEIGHT + 1),
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            };

            if card_area.y + CARD_HEIGHT > area.y + area.height
                || card_area.x + CARD_WIDTH > area.x + area.width
            {
                continue;
            }

            render_card(card_area, buf, card);
        }
    }
}

struct StatCard {
    title: &'static str,
    value: String,
    color: Color,
}

fn render_card(area: Rect, buf: &mut Buffer, card: &StatCard) {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(card.color))
        .render(area, buf);

    let title_x = area.x + (area.width.saturating_sub(card.title.len() as u16)) / 2;
    buf.set_string(
        title_x,
        area.y + 1,
        card.title,
        Style::default().fg(card.color),
    );

    // Long restaurant names are cut to the card's inner width
    let inner = area.width.saturating_sub(2) as usize;
    let value: String = card.value.chars().take(inner).collect();
    let value_x = area.x + (area.width.saturating_sub(value.chars().count() as u16)) / 2;
    buf.set_string(
        value_x,
        area.y + 3,
        &value,
        Style::default()
            .fg(card.color)
            .add_modifier(Modifier::BOLD),
    );
}
