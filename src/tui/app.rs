//! Application state and event loop

use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};
use tracing::{info, warn};

use crate::collector::{SyncEvent, SyncStatus};
use crate::services::{run_sync, Aggregator, Config, OrderStore, StoredOrders};
use crate::types::{
    CategorySlice, DateRange, MetricsSnapshot, RangePreset, RankedRestaurant, StoreWarning,
    TOP_RESTAURANTS,
};

use super::theme::{StatusTone, Theme};
use super::widgets::{
    help::HelpPopup,
    hours::HoursView,
    monthly::{MonthlyView, VISIBLE_MONTHS},
    overview::{Overview, OverviewData},
    render_keybindings,
    restaurants::{RestaurantsData, RestaurantsView},
    spinner::Spinner,
    tabs::{Tab, TabBar},
};

const LOADING_MESSAGE: &str = "Loading order history...";
const EMPTY_MESSAGE: &str = "No data found. Press s to sync your order history.";

/// Application state
pub enum AppState {
    /// Loading the store with spinner animation
    Loading { spinner_frame: usize },
    /// Store is missing or holds no orders
    Empty,
    /// Ready with loaded data
    Ready { data: Box<AppData> },
    /// Error state
    Error { message: String },
}

/// Loaded orders plus everything derived from them for the active range
pub struct AppData {
    pub stored: StoredOrders,
    pub range: DateRange,
    pub metrics: MetricsSnapshot,
    pub trend: Vec<(String, f64)>,
    pub ranked: Vec<RankedRestaurant>,
    pub breakdown: Vec<CategorySlice>,
}

impl AppData {
    pub fn build(stored: StoredOrders, preset: RangePreset, today: NaiveDate) -> Self {
        let range = preset.range(today);
        let metrics = Aggregator::metrics(&stored.orders, &range);
        Self {
            trend: metrics.monthly_trend(),
            ranked: metrics.top_restaurants(TOP_RESTAURANTS),
            breakdown: metrics.category_breakdown(),
            stored,
            range,
            metrics,
        }
    }

    /// Recompute metrics for a new range without reloading the store
    fn rebuild(self, preset: RangePreset, today: NaiveDate) -> Self {
        Self::build(self.stored, preset, today)
    }
}

/// Messages from the background sync thread
#[derive(Debug, Clone, PartialEq)]
pub enum SyncMessage {
    Event(SyncEvent),
    Finished(Result<SyncStatus, String>),
}

/// Status line shown at the bottom of the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub tone: StatusTone,
}

impl StatusLine {
    fn new(message: impl Into<String>, tone: StatusTone) -> Self {
        Self {
            message: message.into(),
            tone,
        }
    }
}

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    current_tab: Tab,
    monthly_scroll: usize,
    show_help: bool,
    preset: RangePreset,
    status: Option<StatusLine>,
    syncing: bool,
    sync_requested: bool,
    reload_requested: bool,
    theme: Theme,
}

impl App {
    /// Create a new app in loading state
    pub fn new(theme: Theme) -> Self {
        Self {
            state: AppState::Loading { spinner_frame: 0 },
            should_quit: false,
            current_tab: Tab::default(),
            monthly_scroll: 0,
            show_help: false,
            preset: RangePreset::default(),
            status: None,
            syncing: false,
            sync_requested: false,
            reload_requested: false,
            theme,
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Tab => {
                        self.current_tab = self.current_tab.next();
                    }
                    KeyCode::BackTab => {
                        self.current_tab = self.current_tab.prev();
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.scroll_up();
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.scroll_down();
                    }
                    KeyCode::Char(c @ '1'..='4') => {
                        if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                            self.current_tab = tab;
                        }
                    }
                    KeyCode::Char('?') => {
                        self.show_help = !self.show_help;
                    }
                    KeyCode::Char('f') => {
                        self.cycle_range(Local::now().date_naive());
                    }
                    KeyCode::Char('s') => {
                        self.request_sync();
                    }
                    _ => {}
                }
            }
        }
    }

    /// Advance to the next range preset and recompute metrics
    fn cycle_range(&mut self, today: NaiveDate) {
        self.preset = self.preset.next();
        let state = std::mem::replace(&mut self.state, AppState::Empty);
        self.state = match state {
            AppState::Ready { data } => AppState::Ready {
                data: Box::new(data.rebuild(self.preset, today)),
            },
            other => other,
        };
        self.monthly_scroll = self.max_monthly_scroll();
    }

    fn request_sync(&mut self) {
        if self.syncing {
            self.status = Some(StatusLine::new(
                "A sync is already running.",
                StatusTone::Warning,
            ));
            return;
        }
        self.syncing = true;
        self.sync_requested = true;
        self.status = Some(StatusLine::new("Starting sync...", StatusTone::Progress));
    }

    /// True once per `s` press; the event loop then spawns the sync thread
    pub fn take_sync_request(&mut self) -> bool {
        std::mem::take(&mut self.sync_requested)
    }

    /// True once per completed sync; the event loop then reloads the store
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    /// Apply a progress message from the sync thread
    pub fn handle_sync_message(&mut self, message: SyncMessage) {
        match message {
            SyncMessage::Event(event) => {
                let tone = match &event {
                    SyncEvent::StatusUpdate { .. } => StatusTone::Progress,
                    SyncEvent::SyncComplete { .. } => {
                        self.reload_requested = true;
                        StatusTone::Success
                    }
                    SyncEvent::SyncFailed { .. } => StatusTone::Failure,
                };
                self.status = Some(StatusLine::new(event.message(), tone));
            }
            SyncMessage::Finished(result) => {
                self.syncing = false;
                match result {
                    Ok(SyncStatus::Completed { .. }) => {}
                    Ok(SyncStatus::AlreadyRunning) => {
                        self.status = Some(StatusLine::new(
                            "A sync is already running.",
                            StatusTone::Warning,
                        ));
                    }
                    Err(message) => {
                        // Keep the collector's own failure text when it already arrived
                        let reported = matches!(
                            self.status,
                            Some(StatusLine {
                                tone: StatusTone::Failure,
                                ..
                            })
                        );
                        if !reported {
                            self.status = Some(StatusLine::new(
                                format!("Sync failed: {}", message),
                                StatusTone::Failure,
                            ));
                        }
                    }
                }
            }
        }
    }

    /// Apply a store load result to app state
    pub fn apply_loaded(
        &mut self,
        loaded: (Option<StoredOrders>, Option<StoreWarning>),
        today: NaiveDate,
    ) {
        let (stored, warning) = loaded;
        if let Some(warning) = warning {
            warn!(%warning, "order store unusable");
            self.status = Some(StatusLine::new(
                format!("Warning: {}", warning),
                StatusTone::Warning,
            ));
        }
        self.state = match stored {
            Some(stored) if !stored.orders.is_empty() => AppState::Ready {
                data: Box::new(AppData::build(stored, self.preset, today)),
            },
            _ => AppState::Empty,
        };
        self.monthly_scroll = self.max_monthly_scroll();
    }

    fn max_monthly_scroll(&self) -> usize {
        match &self.state {
            AppState::Ready { data } => {
                MonthlyView::max_scroll_offset(data.trend.len(), VISIBLE_MONTHS)
            }
            _ => 0,
        }
    }

    /// Scroll up in the current view
    fn scroll_up(&mut self) {
        if self.current_tab == Tab::Monthly {
            self.monthly_scroll = self.monthly_scroll.saturating_sub(1);
        }
    }

    /// Scroll down in the current view
    fn scroll_down(&mut self) {
        if self.current_tab == Tab::Monthly {
            self.monthly_scroll = (self.monthly_scroll + 1).min(self.max_monthly_scroll());
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if let AppState::Loading { spinner_frame } = &self.state {
            self.state = AppState::Loading {
                spinner_frame: Spinner::next_frame(*spinner_frame),
            };
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        if let Some(status) = &self.status {
            Paragraph::new(Line::from(Span::styled(
                status.message.as_str(),
                Style::default().fg(self.theme.status_color(status.tone)),
            )))
            .alignment(Alignment::Center)
            .render(area, buf);
        }
    }

    fn render_empty(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1), // Message
            Constraint::Length(1), // Blank
            Constraint::Length(1), // Keybindings
            Constraint::Min(0),
        ])
        .split(area);

        Paragraph::new(Span::styled(
            EMPTY_MESSAGE,
            Style::default().fg(self.theme.text()),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
        render_keybindings(chunks[3], buf, self.theme);
    }

    fn render_ready(&self, data: &AppData, area: Rect, buf: &mut Buffer) {
        let tabs = TabBar::new(self.current_tab, self.theme).with_preset(self.preset);
        match self.current_tab {
            Tab::Overview => {
                let range_label = data.range.label();
                let overview_data = OverviewData {
                    metrics: &data.metrics,
                    range_label: &range_label,
                    last_synced: data.stored.last_synced,
                };
                Overview::new(overview_data, self.theme)
                    .with_tabs(tabs)
                    .render(area, buf);
            }
            Tab::Monthly => {
                MonthlyView::new(&data.trend, self.monthly_scroll, self.theme)
                    .with_tabs(tabs)
                    .render(area, buf);
            }
            Tab::Hours => {
                HoursView::new(&data.metrics.time_of_day, self.theme)
                    .with_tabs(tabs)
                    .render(area, buf);
            }
            Tab::Restaurants => {
                let restaurants_data = RestaurantsData {
                    ranked: &data.ranked,
                    breakdown: &data.breakdown,
                    total_spent: data.metrics.total_spent,
                };
                RestaurantsView::new(restaurants_data, self.theme)
                    .with_tabs(tabs)
                    .render(area, buf);
            }
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [main, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

        match &self.state {
            AppState::Loading { spinner_frame } => {
                Spinner::new(*spinner_frame, LOADING_MESSAGE, self.theme).render(main, buf);
            }
            AppState::Empty => self.render_empty(main, buf),
            AppState::Ready { data } => self.render_ready(data, main, buf),
            AppState::Error { message } => {
                let y = main.y + main.height / 2;
                let text = format!("Error: {}", message);
                let x = main.x + (main.width.saturating_sub(text.chars().count() as u16)) / 2;
                buf.set_string(x, y, &text, Style::default().fg(self.theme.error()));
            }
        }

        self.render_status(status, buf);

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the dashboard until the user quits.
/// Theme detection runs before the terminal enters raw mode.
pub fn run(config: Config, store: OrderStore) -> anyhow::Result<()> {
    let theme = Theme::detect();
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, config, store, theme);
    ratatui::restore();
    result
}

/// Run one sync on its own runtime, forwarding progress over `tx`
fn spawn_sync(config: Config, store: OrderStore) -> mpsc::Receiver<SyncMessage> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let event_tx = tx.clone();
        let result = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| e.to_string())
            .and_then(|runtime| {
                runtime
                    .block_on(run_sync(&config, store, move |event: &SyncEvent| {
                        let _ = event_tx.send(SyncMessage::Event(event.clone()));
                    }))
                    .map_err(|e| e.to_string())
            });
        let _ = tx.send(SyncMessage::Finished(result));
    });
    rx
}

fn run_app(
    terminal: &mut DefaultTerminal,
    config: Config,
    store: OrderStore,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut app = App::new(theme);

    // Spawn background thread for the initial store load
    let (data_tx, data_rx) = mpsc::channel();
    let loader = store.clone();
    thread::spawn(move || {
        let _ = data_tx.send(loader.load());
    });

    let mut sync_rx: Option<mpsc::Receiver<SyncMessage>> = None;

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if matches!(app.state, AppState::Loading { .. }) {
            match data_rx.try_recv() {
                Ok(loaded) => app.apply_loaded(loaded, Local::now().date_naive()),
                Err(TryRecvError::Disconnected) => {
                    app.state = AppState::Error {
                        message: "order store loader stopped unexpectedly".to_string(),
                    };
                }
                Err(TryRecvError::Empty) => {}
            }
        }

        if app.take_sync_request() {
            info!("sync requested from dashboard");
            sync_rx = Some(spawn_sync(config.clone(), store.clone()));
        }

        if let Some(rx) = &sync_rx {
            let mut done = false;
            loop {
                match rx.try_recv() {
                    Ok(message) => {
                        done = matches!(message, SyncMessage::Finished(_));
                        app.handle_sync_message(message);
                        if done {
                            break;
                        }
                    }
                    Err(TryRecvError::Disconnected) => {
                        app.handle_sync_message(SyncMessage::Finished(Err(
                            "sync thread stopped unexpectedly".to_string(),
                        )));
                        done = true;
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }
            if done {
                sync_rx = None;
            }
        }

        if app.take_reload_request() {
            app.apply_loaded(store.load(), Local::now().date_naive());
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawOrder;
    use chrono::{TimeZone, Utc};
    use crossterm::event::{KeyEvent, KeyModifiers};
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn order(id: u64, date: &str, cost: f64, restaurant: &str) -> RawOrder {
        RawOrder::new(json!({
            "orderId": id,
            "orderDate": date,
            "totalCost": cost,
            "paymentStatus": 1,
            "resInfo": { "name": restaurant },
        }))
    }

    fn stored() -> StoredOrders {
        StoredOrders {
            last_synced: Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap(),
            orders: vec![
                order(1, "March 10, 2024 at 08:30 PM", 500.0, "Truffles"),
                order(2, "January 5, 2024 at 01:00 PM", 300.0, "Meghana Foods"),
                order(3, "June 1, 2023 at 09:00 PM", 200.0, "Truffles"),
            ],
        }
    }

    /// Helper to create a ready app with a few orders
    fn make_ready_app() -> App {
        let mut app = App::new(Theme::Dark);
        app.apply_loaded((Some(stored()), None), today());
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn metrics(app: &App) -> &MetricsSnapshot {
        match &app.state {
            AppState::Ready { data } => &data.metrics,
            _ => panic!("app is not ready"),
        }
    }

    #[test]
    fn test_app_initial_state() {
        let app = App::new(Theme::Dark);
        assert!(matches!(app.state, AppState::Loading { spinner_frame: 0 }));
        assert!(!app.should_quit());
        assert_eq!(app.preset, RangePreset::All);
    }

    #[test]
    fn test_app_quit_on_q() {
        let mut app = App::new(Theme::Dark);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_app_quit_on_esc() {
        let mut app = App::new(Theme::Dark);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn test_app_tick_updates_spinner() {
        let mut app = App::new(Theme::Dark);
        app.tick();
        assert!(matches!(app.state, AppState::Loading { spinner_frame: 1 }));
    }

    #[test]
    fn test_app_tab_navigation() {
        let mut app = App::new(Theme::Dark);
        assert_eq!(app.current_tab, Tab::Overview);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Monthly);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Hours);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Restaurants);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_tab, Tab::Overview);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_tab, Tab::Restaurants);
    }

    #[test]
    fn test_app_number_key_navigation() {
        let mut app = App::new(Theme::Dark);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_tab, Tab::Hours);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.current_tab, Tab::Overview);
    }

    #[test]
    fn test_app_help_toggle() {
        let mut app = App::new(Theme::Dark);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('?'));
        assert!(!app.show_help);
    }

    // ========== Loading ==========

    #[test]
    fn test_missing_store_is_empty() {
        let mut app = App::new(Theme::Dark);
        app.apply_loaded((None, None), today());
        assert!(matches!(app.state, AppState::Empty));
        assert!(app.status.is_none());
    }

    #[test]
    fn test_store_without_orders_is_empty() {
        let mut app = App::new(Theme::Dark);
        let empty = StoredOrders {
            last_synced: Utc::now(),
            orders: vec![],
        };
        app.apply_loaded((Some(empty), None), today());
        assert!(matches!(app.state, AppState::Empty));
    }

    #[test]
    fn test_corrupt_store_warns() {
        let mut app = App::new(Theme::Dark);
        app.apply_loaded(
            (None, Some(StoreWarning::Corrupted("bad json".into()))),
            today(),
        );
        assert!(matches!(app.state, AppState::Empty));
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.tone, StatusTone::Warning);
        assert!(status.message.contains("bad json"));
    }

    #[test]
    fn test_ready_computes_all_time_metrics() {
        let app = make_ready_app();
        let m = metrics(&app);
        assert_eq!(m.total_orders, 3);
        assert!((m.total_spent - 1000.0).abs() < 1e-9);
    }

    // ========== Range presets ==========

    #[test]
    fn test_cycle_range_recomputes_metrics() {
        let mut app = make_ready_app();

        // Last 7 days: only the March 10 order
        app.cycle_range(today());
        assert_eq!(app.preset, RangePreset::Last7);
        assert_eq!(metrics(&app).total_orders, 1);

        // Last 30 days: still just March 10
        app.cycle_range(today());
        assert_eq!(metrics(&app).total_orders, 1);

        // Last 90 days: March 10 and January 5
        app.cycle_range(today());
        assert_eq!(metrics(&app).total_orders, 2);
    }

    #[test]
    fn test_cycle_range_wraps_to_all() {
        let mut app = make_ready_app();
        for _ in 0..5 {
            app.cycle_range(today());
        }
        assert_eq!(app.preset, RangePreset::All);
        assert_eq!(metrics(&app).total_orders, 3);
    }

    #[test]
    fn test_cycle_range_when_empty_keeps_state() {
        let mut app = App::new(Theme::Dark);
        app.apply_loaded((None, None), today());
        app.cycle_range(today());
        assert_eq!(app.preset, RangePreset::Last7);
        assert!(matches!(app.state, AppState::Empty));
    }

    // ========== Sync ==========

    #[test]
    fn test_s_requests_sync_once() {
        let mut app = make_ready_app();
        press(&mut app, KeyCode::Char('s'));
        assert!(app.take_sync_request());
        assert!(!app.take_sync_request());
        assert!(app.syncing);

        // Second press while running does not spawn another
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.take_sync_request());
        assert_eq!(app.status.as_ref().unwrap().tone, StatusTone::Warning);
    }

    #[test]
    fn test_progress_events_update_status() {
        let mut app = make_ready_app();
        press(&mut app, KeyCode::Char('s'));

        app.handle_sync_message(SyncMessage::Event(SyncEvent::status("Fetching page 2...")));
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.message, "Fetching page 2...");
        assert_eq!(status.tone, StatusTone::Progress);
        assert!(!app.take_reload_request());
    }

    #[test]
    fn test_sync_complete_requests_reload() {
        let mut app = make_ready_app();
        press(&mut app, KeyCode::Char('s'));

        app.handle_sync_message(SyncMessage::Event(SyncEvent::SyncComplete { count: 5 }));
        app.handle_sync_message(SyncMessage::Finished(Ok(SyncStatus::Completed {
            count: 5,
        })));

        assert!(app.take_reload_request());
        assert!(!app.syncing);
        assert_eq!(app.status.as_ref().unwrap().tone, StatusTone::Success);
    }

    #[test]
    fn test_sync_failure_keeps_collector_message() {
        let mut app = make_ready_app();
        press(&mut app, KeyCode::Char('s'));

        let message = "Error: request failed with status 401. Make sure you are logged in.";
        app.handle_sync_message(SyncMessage::Event(SyncEvent::SyncFailed {
            message: message.into(),
        }));
        app.handle_sync_message(SyncMessage::Finished(Err("status 401".into())));

        let status = app.status.as_ref().unwrap();
        assert_eq!(status.message, message);
        assert_eq!(status.tone, StatusTone::Failure);
        assert!(!app.take_reload_request());
        assert!(!app.syncing);
    }

    #[test]
    fn test_sync_error_without_event() {
        let mut app = make_ready_app();
        press(&mut app, KeyCode::Char('s'));
        app.handle_sync_message(SyncMessage::Finished(Err("host not ready".into())));

        let status = app.status.as_ref().unwrap();
        assert_eq!(status.message, "Sync failed: host not ready");
        assert_eq!(status.tone, StatusTone::Failure);
    }

    // ========== Scrolling ==========

    #[test]
    fn test_monthly_scroll_clamped() {
        let mut app = make_ready_app();
        app.current_tab = Tab::Monthly;
        // Three months fit on screen, nothing to scroll
        press(&mut app, KeyCode::Down);
        assert_eq!(app.monthly_scroll, 0);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.monthly_scroll, 0);
    }

    // ========== Rendering ==========

    #[test]
    fn test_render_empty_message() {
        let mut app = App::new(Theme::Dark);
        app.apply_loaded((None, None), today());

        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        assert!(text.contains("No data found. Press s to sync your order history."));
    }

    #[test]
    fn test_tab_bar_follows_range_preset() {
        let mut app = make_ready_app();
        app.cycle_range(today());
        app.cycle_range(today());

        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);

        let top: String = (0..area.height.min(3))
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        assert!(top.contains("f Last 30 days"));
        assert!(top.contains("1 Overview"));
    }

    #[test]
    fn test_render_every_tab() {
        let mut app = make_ready_app();
        for tab in Tab::all() {
            app.current_tab = *tab;
            let area = Rect::new(0, 0, 100, 30);
            let mut buf = Buffer::empty(area);
            (&app).render(area, &mut buf);
        }
    }
}
