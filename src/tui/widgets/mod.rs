//! TUI widgets

pub mod help;
pub mod hours;
pub mod monthly;
pub mod overview;
pub mod restaurants;
pub mod spinner;
pub mod tabs;

pub use hours::hour_label;
pub use overview::{format_currency, format_number};

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Full-width horizontal rule
pub(crate) fn render_separator(area: Rect, buf: &mut Buffer, theme: Theme) {
    let line = "─".repeat(area.width as usize);
    buf.set_string(area.x, area.y, &line, Style::default().fg(theme.muted()));
}

/// Bottom keybinding hints shared by every view
pub(crate) fn render_keybindings(area: Rect, buf: &mut Buffer, theme: Theme) {
    let key = Style::default().fg(theme.accent());
    let desc = Style::default().fg(theme.muted());
    Paragraph::new(Line::from(vec![
        Span::styled("q", key),
        Span::styled(": Quit", desc),
        Span::raw("  "),
        Span::styled("Tab", key),
        Span::styled(": Switch view", desc),
        Span::raw("  "),
        Span::styled("f", key),
        Span::styled(": Range", desc),
        Span::raw("  "),
        Span::styled("s", key),
        Span::styled(": Sync", desc),
        Span::raw("  "),
        Span::styled("?", key),
        Span::styled(": Help", desc),
    ]))
    .alignment(Alignment::Center)
    .render(area, buf);
}
