//! Dashboard navigation bar: numbered views on the left, active range filter on the right

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;
use crate::types::RangePreset;

/// Dashboard views, in number-key order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Monthly,
    Hours,
    Restaurants,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Monthly, Tab::Hours, Tab::Restaurants];

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Monthly => "Monthly",
            Self::Hours => "Hours",
            Self::Restaurants => "Restaurants",
        }
    }

    pub fn all() -> &'static [Tab] {
        &Self::ALL
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Number key that selects this view (1-based)
    pub fn hotkey(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }
}

/// Navigation line shared by every view
#[derive(Debug, Clone, Copy)]
pub struct TabBar {
    selected: Tab,
    preset: RangePreset,
    theme: Theme,
}

impl TabBar {
    pub fn new(selected: Tab, theme: Theme) -> Self {
        Self {
            selected,
            preset: RangePreset::default(),
            theme,
        }
    }

    pub fn with_preset(mut self, preset: RangePreset) -> Self {
        self.preset = preset;
        self
    }

    fn tab_spans(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::with_capacity(Tab::ALL.len() * 3);
        for tab in Tab::all() {
            if !spans.is_empty() {
                spans.push(Span::raw("  "));
            }
            let (key_style, label_style) = if *tab == self.selected {
                let active = Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD);
                (active, active.add_modifier(Modifier::UNDERLINED))
            } else {
                (
                    Style::default().fg(self.theme.muted()),
                    Style::default().fg(self.theme.text()),
                )
            };
            spans.push(Span::styled(format!("{} ", tab.hotkey()), key_style));
            spans.push(Span::styled(tab.label(), label_style));
        }
        spans
    }

    fn filter_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled("f ", Style::default().fg(self.theme.muted())),
            Span::styled(self.preset.label(), Style::default().fg(self.theme.date())),
        ])
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let tabs = Line::from(self.tab_spans());
        let filter = self.filter_line();
        let filter_width = filter.width() as u16;
        let needed = tabs.width() + filter.width() + 2;

        // Filter chip is dropped first on narrow terminals
        if needed <= area.width as usize {
            Paragraph::new(tabs)
                .alignment(Alignment::Left)
                .render(area, buf);
            let chip = Rect {
                x: area.right() - filter_width,
                width: filter_width,
                ..area
            };
            Paragraph::new(filter).render(chip, buf);
        } else {
            Paragraph::new(tabs)
                .alignment(Alignment::Center)
                .render(area, buf);
        }
    }
}
