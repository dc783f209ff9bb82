//! App module - contains the main application state and logic

mod filters;
mod history;
mod live;
mod news;

use crate::constants::*;
use crate::db::Database;
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use eframe::egui;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) db: Database,
    pub(crate) db_path: PathBuf,
    pub(crate) data_dir: PathBuf,
    // Symbol list
    pub(crate) symbols: Vec<Equity>,
    pub(crate) filtered_indices: Vec<usize>,
    pub(crate) selected: Option<usize>,
    pub(crate) search_query: String,
    pub(crate) focus_search: bool,
    pub(crate) sector_filters: HashSet<String>,
    pub(crate) watch_filter: WatchFilter,
    pub(crate) sort_column: SortColumn,
    pub(crate) sort_direction: SortDirection,
    // View
    pub(crate) tab: Tab,
    pub(crate) chart_range: ChartRange,
    pub(crate) ma_window: usize,
    pub(crate) poll_secs: u64,
    pub(crate) show_settings: bool,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Background slots
    pub(crate) history: Arc<Mutex<HistorySlot>>,
    pub(crate) profile: Arc<Mutex<ProfileSlot>>,
    pub(crate) news: Arc<Mutex<NewsSlot>>,
    pub(crate) live: Arc<Mutex<LiveSlot>>,
    pub(crate) live_token: Option<CancellationToken>,
    pub(crate) prefetch_running: bool,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) http: reqwest::Client,
    // Status line
    pub(crate) bar_cache_count: usize,
    // Toast notification
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) started: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        db: Database,
        db_path: PathBuf,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let symbols = db.get_all_symbols().unwrap_or_default();
        let filtered_indices: Vec<usize> = (0..symbols.len()).collect();
        let selected = settings
            .last_symbol
            .as_deref()
            .and_then(|code| symbols.iter().position(|s| s.code == code));
        let bar_cache_count = db.bar_count().unwrap_or(0);

        let mut app = Self {
            db,
            db_path,
            data_dir,
            symbols,
            filtered_indices,
            selected,
            search_query: String::new(),
            focus_search: false,
            sector_filters: SECTORS.iter().map(|s| s.to_string()).collect(),
            watch_filter: WatchFilter::All,
            sort_column: SortColumn::Code,
            sort_direction: SortDirection::Ascending,
            tab: Tab::Analysis,
            chart_range: ChartRange::from_key(&settings.chart_range),
            ma_window: settings.ma_window.clamp(MA_WINDOW_MIN, MA_WINDOW_MAX),
            poll_secs: settings.poll_secs.clamp(POLL_SECS_MIN, POLL_SECS_MAX),
            show_settings: false,
            logo_texture: None,
            history: Arc::new(Mutex::new(HistorySlot::default())),
            profile: Arc::new(Mutex::new(ProfileSlot::default())),
            news: Arc::new(Mutex::new(NewsSlot::default())),
            live: Arc::new(Mutex::new(LiveSlot::default())),
            live_token: None,
            prefetch_running: false,
            runtime: tokio::runtime::Runtime::new().unwrap(),
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap(),
            bar_cache_count,
            toast_message: None,
            toast_start: None,
            central_panel_rect: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            started: false,
        };

        app.apply_filters();
        app
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            last_symbol: self.selected_code(),
            ma_window: self.ma_window,
            chart_range: self.chart_range.key().to_string(),
            poll_secs: self.poll_secs,
        };
        settings.save(&self.data_dir);
    }

    pub(crate) fn selected_code(&self) -> Option<String> {
        self.selected
            .and_then(|i| self.symbols.get(i))
            .map(|s| s.code.clone())
    }

    /// Make a symbol the Analysis subject and kick its fetches
    pub(crate) fn select_symbol(&mut self, ctx: &egui::Context, idx: usize) {
        if idx >= self.symbols.len() {
            return;
        }
        let switching = self.selected != Some(idx);
        self.selected = Some(idx);
        if switching {
            self.fetch_history(ctx);
            self.fetch_profile(ctx);
            // The live loop follows the watched symbol
            if self.live.lock().unwrap().running {
                self.start_live(ctx);
            }
        }
    }

    /// Toggle the watchlist star on a symbol and persist immediately
    pub(crate) fn toggle_watchlist(&mut self, idx: usize) {
        if let Some(symbol) = self.symbols.get_mut(idx) {
            symbol.watchlisted = !symbol.watchlisted;
            if let Err(e) = self.db.set_watchlisted(&symbol.code, symbol.watchlisted) {
                tracing::error!(symbol = %symbol.code, error = %e, "Failed to persist watchlist flag");
            }
        }
        self.apply_filters();
    }

    pub(crate) fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }
}
