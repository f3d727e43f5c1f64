//! Hours view widget - order count by hour of day

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph, Widget},
};

use super::overview::format_number;
use super::tabs::{Tab, TabBar};
use super::{render_keybindings, render_separator};
use crate::tui::theme::Theme;

/// 12-hour clock label for an hour index (0 -> "12AM", 13 -> "1PM")
pub fn hour_label(hour: usize) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    let h = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}{}", h, suffix)
}

/// Short axis label that fits a 3-column bar ("12a", "1p")
fn axis_label(hour: usize) -> String {
    let label = hour_label(hour);
    let cut = label.len() - 1;
    label[..cut].to_lowercase()
}

const MAX_CONTENT_WIDTH: u16 = 120;

pub struct HoursView<'a> {
    time_of_day: &'a [u64; 24],
    tabs: TabBar,
    theme: Theme,
}

impl<'a> HoursView<'a> {
    pub fn new(time_of_day: &'a [u64; 24], theme: Theme) -> Self {
        Self {
            time_of_day,
            tabs: TabBar::new(Tab::Hours, theme),
            theme,
        }
    }

    pub fn with_tabs(mut self, tabs: TabBar) -> Self {
        self.tabs = tabs;
        self
    }

    fn bar_width(&self, width: u16) -> u16 {
        // 24 bars with a 1-column gap
        (width.saturating_sub(4) / 24).saturating_sub(1).clamp(1, 3)
    }
}

impl Widget for HoursView<'_> {
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
            Constraint::Length(1), // Title
            Constraint::Length(1), // Blank
            Constraint::Min(6),    // Chart
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Keybindings
        ])
        .split(centered_area);

        self.tabs.render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);

        let total: u64 = self.time_of_day.iter().sum();
        Paragraph::new(Line::from(vec![
            Span::styled(
                "Orders by Hour of Day",
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({} orders)", format_number(total)),
                Style::default().fg(self.theme.muted()),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        let bar_width = self.bar_width(chunks[5].width);
        let bars: Vec<Bar> = self
            .time_of_day
            .iter()
            .enumerate()
            .map(|(hour, &count)| {
                Bar::default()
                    .value(count)
                    .label(Line::from(axis_label(hour)))
                    .style(Style::default().fg(self.theme.bar()))
                    .value_style(
                        Style::default()
                            .fg(self.theme.text())
                            .bg(self.theme.bar()),
                    )
            })
            .collect();

        let chart_width = 24 * (bar_width + 1);
        let chart_area = Rect {
            x: chunks[5].x + chunks[5].width.saturating_sub(chart_width) / 2,
            width: chart_width.min(chunks[5].width),
            ..chunks[5]
        };

        BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1)
            .label_style(Style::default().fg(self.theme.muted()))
            .render(chart_area, buf);

        render_separator(chunks[6], buf, self.theme);
        render_keybindings(chunks[7], buf, self.theme);
    }
}
