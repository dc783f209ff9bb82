#![windows_subsystem = "windows"]
//! Nifty Lens - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod db;
mod feed;
mod indicators;
mod sentiment;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use db::Database;
use eframe::egui;
use tracing::{error, info, warn};
use types::*;
use ui::{chart, components};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "nifty-lens.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nifty_lens=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = utils::get_data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Nifty Lens starting");

    let db_path = data_dir.join("market.db");
    let db = match Database::open(&db_path) {
        Ok(db) => {
            info!(path = %db_path.display(), "Database opened");
            db
        }
        Err(e) => {
            error!(error = %e, path = %db_path.display(), "Failed to open database");
            panic!("Failed to open database: {}", e);
        }
    };

    // Seed the tracked universe on first launch
    let seeded = db.get_meta("universe_version").ok().flatten().is_some();
    if !seeded || db.symbol_count().unwrap_or(0) == 0 {
        match db.import_universe(EQUITY_UNIVERSE) {
            Ok(count) => {
                db.set_meta("universe_version", "1").ok();
                info!(count = count, "Imported equity universe");
            }
            Err(e) => warn!(error = %e, "Failed to seed equity universe"),
        }
    }

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1280.0, 800.0)))
        .with_min_inner_size([1080.0, 680.0])
        .with_title("Nifty Lens");

    // Window/taskbar icon rasterized from the bundled SVG
    {
        let (rgba, w, h) = utils::rasterize_logo_square(64);
        let icon = egui::IconData {
            rgba,
            width: w,
            height: h,
        };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Nifty Lens",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, db, db_path, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Global keyboard capture: type anywhere to search (when no modal open)
        if !self.show_settings && !ctx.wants_keyboard_input() {
            let mut typed_text = String::new();
            let mut backspace = false;
            ctx.input(|i| {
                for event in &i.events {
                    if let egui::Event::Text(text) = event {
                        if !text.is_empty() && text.chars().all(|c| !c.is_control()) {
                            typed_text.push_str(text);
                        }
                    }
                    if let egui::Event::Key {
                        key: egui::Key::Backspace,
                        pressed: true,
                        ..
                    } = event
                    {
                        backspace = true;
                    }
                }
            });
            if !typed_text.is_empty() {
                self.search_query.push_str(&typed_text);
                self.focus_search = true;
                self.apply_filters();
            }
            if backspace && !self.search_query.is_empty() {
                self.search_query.pop();
                self.focus_search = true;
                self.apply_filters();
            }
        }

        // First frame: kick the headline feed and the selected symbol's data
        if !self.started {
            self.started = true;
            self.fetch_news(ctx, false);
            if self.selected.is_some() {
                self.fetch_history(ctx);
                self.fetch_profile(ctx);
            }
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Check for results handed over from background tasks
        self.poll_background_results(ctx);

        // Settings modal
        self.render_settings_modal(ctx);

        // Left sidebar - symbol list (must be added BEFORE CentralPanel)
        self.render_sidebar(ctx);

        // Central panel with the tabbed views
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(16)),
            )
            .show(ctx, |ui| {
                // Store panel rect for toast positioning
                self.central_panel_rect = Some(ui.max_rect());

                self.render_header(ui);
                ui.add_space(theme::SPACING_MD);

                match self.tab {
                    Tab::Analysis => self.render_analysis(ui, ctx),
                    Tab::News => self.render_news(ui, ctx),
                    Tab::Live => self.render_live(ui, ctx),
                }
            });

        self.render_toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.stop_live();
        self.save_settings();
    }
}

// ============================================================================
// BACKGROUND RESULT POLLING
// ============================================================================

impl App {
    fn poll_background_results(&mut self, ctx: &egui::Context) {
        // Bar cache refreshed by a history fetch
        if ctx
            .memory(|mem| mem.data.get_temp::<String>("bars_cached".into()))
            .is_some()
        {
            ctx.memory_mut(|mem| mem.data.remove::<String>("bars_cached".into()));
            self.bar_cache_count = self.db.bar_count().unwrap_or(self.bar_cache_count);
        }

        // Watchlist prefetch finished
        if let Some(warmed) =
            ctx.memory(|mem| mem.data.get_temp::<String>("prefetch_done".into()))
        {
            ctx.memory_mut(|mem| mem.data.remove::<String>("prefetch_done".into()));
            self.prefetch_running = false;
            self.bar_cache_count = self.db.bar_count().unwrap_or(self.bar_cache_count);
            self.show_toast(format!("Watchlist cache warmed for {} symbols", warmed));
        }

        // Manual headline refresh finished
        if let Some(count) =
            ctx.memory(|mem| mem.data.get_temp::<String>("news_refreshed".into()))
        {
            ctx.memory_mut(|mem| mem.data.remove::<String>("news_refreshed".into()));
            self.show_toast(format!("Fetched {} headlines", count));
        }
    }
}

// ============================================================================
// SIDEBAR
// ============================================================================

enum RowAction {
    Select,
    ToggleStar,
}

impl App {
    fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("symbol_panel")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::new().fill(theme::BG_BASE).inner_margin(egui::Margin {
                    left: 16,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
            )
            .show(ctx, |ui| {
                ui.set_max_width(theme::SIDEBAR_WIDTH - 16.0);
                let avail_w = ui.available_width();

                ui.add_space(18.0);
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    let texture = self.logo_texture.get_or_insert_with(|| {
                        let (pixels, w, h) = utils::rasterize_logo(avail_w as u32 * 2);
                        ctx.load_texture(
                            "logo",
                            egui::ColorImage::from_rgba_unmultiplied(
                                [w as usize, h as usize],
                                &pixels,
                            ),
                            egui::TextureOptions::LINEAR,
                        )
                    });
                    let aspect = texture.size()[1] as f32 / texture.size()[0] as f32;
                    let logo_w = avail_w * 0.42;
                    ui.add(
                        egui::Image::new(&*texture)
                            .fit_to_exact_size(egui::vec2(logo_w, logo_w * aspect)),
                    );
                    ui.add_space(4.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("NIFTY LENS")
                                .size(theme::FONT_TITLE)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("NSE equity dashboard")
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });

                ui.add_space(12.0);
                self.render_search_box(ui);
                ui.add_space(8.0);

                // Watchlist segments
                let watch_idx = match self.watch_filter {
                    WatchFilter::All => 0,
                    WatchFilter::Watchlist => 1,
                    WatchFilter::Others => 2,
                };
                let seg_w = (ui.available_width() - 8.0) / 3.0;
                if let Some(clicked) =
                    theme::segmented_strip(ui, &["All", "Watchlist", "Others"], watch_idx, seg_w)
                {
                    self.watch_filter = match clicked {
                        1 => WatchFilter::Watchlist,
                        2 => WatchFilter::Others,
                        _ => WatchFilter::All,
                    };
                    self.apply_filters();
                }

                ui.add_space(8.0);
                self.render_sector_chips(ui);
                ui.add_space(8.0);
                self.render_sort_row(ui);
                ui.add_space(4.0);
                ui.separator();

                // Space reserved under the list for the cache button and version
                let bottom_height = 36.0 + 18.0 + 16.0;
                let list_height = ui.available_height() - bottom_height;

                let mut clicked_row: Option<usize> = None;
                let mut starred_row: Option<usize> = None;

                egui::ScrollArea::vertical()
                    .max_height(list_height)
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        if self.filtered_indices.is_empty() {
                            ui.add_space(16.0);
                            ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                                ui.label(
                                    egui::RichText::new("No symbols match")
                                        .color(theme::TEXT_DIM),
                                );
                            });
                        }
                        for &idx in &self.filtered_indices.clone() {
                            match self.render_symbol_row(ui, idx) {
                                Some(RowAction::Select) => clicked_row = Some(idx),
                                Some(RowAction::ToggleStar) => starred_row = Some(idx),
                                None => {}
                            }
                        }
                    });

                if let Some(idx) = starred_row {
                    self.toggle_watchlist(idx);
                }
                if let Some(idx) = clicked_row {
                    self.select_symbol(ctx, idx);
                }

                ui.add_space(6.0);
                let cache_label = if self.prefetch_running {
                    format!("{}  Warming cache...", egui_phosphor::regular::HOURGLASS)
                } else {
                    format!(
                        "{}  Warm watchlist cache",
                        egui_phosphor::regular::DOWNLOAD_SIMPLE
                    )
                };
                let cache_btn = ui.add_enabled(
                    !self.prefetch_running,
                    theme::button(cache_label)
                        .min_size(egui::vec2(ui.available_width() - 8.0, 30.0)),
                );
                if cache_btn.clicked() {
                    self.prefetch_watchlist(ctx);
                }
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(format!("v{}", APP_VERSION))
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });
            });
    }

    fn render_search_box(&mut self, ui: &mut egui::Ui) {
        let search_frame_resp = egui::Frame::new()
            .fill(theme::BG_INPUT)
            .stroke(egui::Stroke::new(1.0, theme::BORDER_SUBTLE))
            .corner_radius(theme::RADIUS_DEFAULT)
            .inner_margin(egui::Margin::symmetric(8, 8))
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS)
                                .size(14.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                    let search_id = ui.make_persistent_id("search_box");
                    let search_response = ui.add(
                        egui::TextEdit::singleline(&mut self.search_query)
                            .id(search_id)
                            .hint_text("Search code / company...")
                            .frame(false)
                            .desired_width(ui.available_width()),
                    );
                    if self.focus_search {
                        self.focus_search = false;
                        search_response.request_focus();
                        if let Some(mut state) = egui::TextEdit::load_state(ui.ctx(), search_id) {
                            let ccursor = egui::text::CCursor::new(self.search_query.len());
                            state
                                .cursor
                                .set_char_range(Some(egui::text::CCursorRange::one(ccursor)));
                            state.store(ui.ctx(), search_id);
                        }
                        self.apply_filters();
                    }
                    if search_response.changed() {
                        self.apply_filters();
                    }
                });
            });

        // Clear button overlaid on right side of search frame
        if !self.search_query.is_empty() {
            let frame_rect = search_frame_resp.response.rect;
            let btn_size = 16.0;
            let btn_rect = egui::Rect::from_center_size(
                egui::pos2(frame_rect.right() - 14.0, frame_rect.center().y),
                egui::vec2(btn_size, btn_size),
            );
            let clear_resp =
                ui.interact(btn_rect, ui.id().with("search_clear"), egui::Sense::click());
            let color = if clear_resp.hovered() {
                theme::TEXT_MUTED
            } else {
                theme::TEXT_DIM
            };
            if clear_resp.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            ui.painter().text(
                btn_rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::X,
                egui::FontId::proportional(12.0),
                color,
            );
            if clear_resp.clicked() {
                self.search_query.clear();
                self.apply_filters();
            }
        }
    }

    fn render_sector_chips(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Sectors")
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let all_on = self.sector_filters.len() == SECTORS.len();
                let label = if all_on { "None" } else { "All" };
                if ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new(label)
                                .size(theme::FONT_SMALL)
                                .color(theme::ACCENT),
                        )
                        .frame(false),
                    )
                    .clicked()
                {
                    if all_on {
                        self.sector_filters.clear();
                    } else {
                        self.sector_filters = SECTORS.iter().map(|s| s.to_string()).collect();
                    }
                    self.apply_filters();
                }
            });
        });
        ui.add_space(2.0);

        let mut toggled: Option<&str> = None;
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(4.0, 4.0);
            for &sector in SECTORS {
                let active = self.sector_filters.contains(sector);
                let (bg, text) = theme::sector_colors(sector);
                let font = egui::FontId::proportional(10.0);
                let galley =
                    ui.fonts(|f| f.layout_no_wrap(sector.to_string(), font.clone(), text));
                let size = egui::vec2(galley.rect.width() + 14.0, 18.0);
                let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
                if ui.is_rect_visible(rect) {
                    let painter = ui.painter();
                    let (fill, fg) = if active {
                        (bg, text)
                    } else {
                        (theme::BG_ELEVATED, theme::TEXT_DIM)
                    };
                    painter.rect_filled(rect, 9.0, fill);
                    if active {
                        painter.rect_stroke(
                            rect,
                            9.0,
                            egui::Stroke::new(1.0, fg.gamma_multiply(0.5)),
                            egui::StrokeKind::Inside,
                        );
                    }
                    painter.text(rect.center(), egui::Align2::CENTER_CENTER, sector, font, fg);
                }
                if response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if response.clicked() {
                    toggled = Some(sector);
                }
            }
        });
        if let Some(sector) = toggled {
            if !self.sector_filters.remove(sector) {
                self.sector_filters.insert(sector.to_string());
            }
            self.apply_filters();
        }
    }

    fn render_sort_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Sort")
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
            for (column, label) in [
                (SortColumn::Code, "Code"),
                (SortColumn::Name, "Name"),
                (SortColumn::Sector, "Sector"),
            ] {
                let active = self.sort_column == column;
                let text = if active {
                    let arrow = if self.sort_direction == SortDirection::Ascending {
                        egui_phosphor::regular::CARET_UP
                    } else {
                        egui_phosphor::regular::CARET_DOWN
                    };
                    format!("{} {}", label, arrow)
                } else {
                    label.to_string()
                };
                let color = if active {
                    theme::ACCENT
                } else {
                    theme::TEXT_MUTED
                };
                if ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new(text).size(theme::FONT_SMALL).color(color),
                        )
                        .frame(false),
                    )
                    .clicked()
                {
                    if active {
                        self.sort_direction = match self.sort_direction {
                            SortDirection::Ascending => SortDirection::Descending,
                            SortDirection::Descending => SortDirection::Ascending,
                        };
                    } else {
                        self.sort_column = column;
                        self.sort_direction = SortDirection::Ascending;
                    }
                    self.apply_filters();
                }
            }
        });
    }

    fn render_symbol_row(&mut self, ui: &mut egui::Ui, idx: usize) -> Option<RowAction> {
        let symbol = self.symbols.get(idx)?;
        let selected = self.selected == Some(idx);
        let code = symbol.code.clone();
        let name = symbol.name.clone();
        let sector = symbol.sector.clone();
        let watchlisted = symbol.watchlisted;

        let width = ui.available_width();
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, theme::ROW_HEIGHT), egui::Sense::click());
        let mut action = None;

        if ui.is_rect_visible(rect) {
            if selected {
                ui.painter()
                    .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_HOVER);
                ui.painter().rect_stroke(
                    rect,
                    theme::RADIUS_DEFAULT,
                    egui::Stroke::new(1.0, theme::ACCENT.gamma_multiply(0.4)),
                    egui::StrokeKind::Inside,
                );
            } else if response.hovered() {
                ui.painter()
                    .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_HOVER_SUBTLE);
            }

            let text_x = rect.left() + 8.0;
            ui.painter().text(
                egui::pos2(text_x, rect.top() + 7.0),
                egui::Align2::LEFT_TOP,
                code.trim_end_matches(".NS"),
                egui::FontId::proportional(theme::FONT_LABEL),
                if selected {
                    theme::TEXT_PRIMARY
                } else {
                    theme::TEXT_SECONDARY
                },
            );
            ui.painter().text(
                egui::pos2(text_x, rect.bottom() - 6.0),
                egui::Align2::LEFT_BOTTOM,
                &name,
                egui::FontId::proportional(10.0),
                theme::TEXT_DIM,
            );

            // Sector chip and star pinned to the right edge
            let (chip_bg, chip_text) = theme::sector_colors(&sector);
            let chip_font = egui::FontId::proportional(9.0);
            let galley =
                ui.fonts(|f| f.layout_no_wrap(sector.clone(), chip_font.clone(), chip_text));
            let star_size = 18.0;
            let chip_w = galley.rect.width() + 10.0;
            let chip_rect = egui::Rect::from_center_size(
                egui::pos2(
                    rect.right() - star_size - 10.0 - chip_w / 2.0,
                    rect.center().y,
                ),
                egui::vec2(chip_w, 14.0),
            );
            ui.painter().rect_filled(chip_rect, 7.0, chip_bg);
            ui.painter().text(
                chip_rect.center(),
                egui::Align2::CENTER_CENTER,
                &sector,
                chip_font,
                chip_text,
            );

            let star_rect = egui::Rect::from_center_size(
                egui::pos2(rect.right() - 4.0 - star_size / 2.0, rect.center().y),
                egui::vec2(star_size, star_size),
            );
            let star_resp =
                ui.interact(star_rect, ui.id().with(("star", idx)), egui::Sense::click());
            let star_color = if star_resp.hovered() {
                theme::STAR_FILLED
            } else {
                components::star_color(watchlisted)
            };
            ui.painter().text(
                star_rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::STAR,
                egui::FontId::proportional(14.0),
                star_color,
            );
            if star_resp.clicked() {
                action = Some(RowAction::ToggleStar);
            } else if response.clicked() {
                action = Some(RowAction::Select);
            }
        }
        action
    }
}

// ============================================================================
// CENTRAL PANEL - HEADER AND TABS
// ============================================================================

impl App {
    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match self.selected.and_then(|i| self.symbols.get(i)) {
                Some(symbol) => {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(&symbol.name)
                                .size(theme::FONT_TITLE)
                                .strong(),
                        )
                        .selectable(false),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(&symbol.code)
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                    components::sector_chip(ui, &symbol.sector.clone());
                }
                None => {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Select a symbol")
                                .size(theme::FONT_TITLE)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(egui_phosphor::regular::GEAR).frame(false))
                    .on_hover_text("Settings")
                    .clicked()
                {
                    self.show_settings = !self.show_settings;
                }
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(format!(
                            "{} bars cached • {} symbols",
                            self.bar_cache_count,
                            self.symbols.len()
                        ))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
            });
        });

        ui.add_space(4.0);

        let tabs = [
            (
                Tab::Analysis,
                egui_phosphor::regular::CHART_LINE_UP,
                "Analysis",
            ),
            (Tab::News, egui_phosphor::regular::NEWSPAPER, "News"),
            (Tab::Live, egui_phosphor::regular::PULSE, "Live"),
        ];
        let labels: Vec<String> = tabs
            .iter()
            .map(|(_, icon, name)| format!("{}  {}", icon, name))
            .collect();
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let selected = tabs.iter().position(|(t, _, _)| *t == self.tab).unwrap_or(0);
        if let Some(clicked) = theme::segmented_strip(ui, &label_refs, selected, 110.0) {
            self.tab = tabs[clicked].0;
        }
    }
}

// ============================================================================
// ANALYSIS VIEW
// ============================================================================

impl App {
    fn render_analysis(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.selected.is_none() {
            ui.add_space(40.0);
            ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new("Pick a symbol from the sidebar to analyse")
                        .color(theme::TEXT_DIM),
                );
            });
            return;
        }

        // Snapshot slot contents so no lock is held while rendering
        let (hist_status, bars, warning) = {
            let slot = self.history.lock().unwrap();
            (slot.status.clone(), slot.bars.clone(), slot.warning.clone())
        };
        let (profile_status, profile, polarity) = {
            let slot = self.profile.lock().unwrap();
            (slot.status.clone(), slot.profile.clone(), slot.polarity)
        };

        let mut refresh = false;

        // Stat tiles from the two most recent bars
        if let Some(last) = bars.last() {
            let prev_close = bars.len().checked_sub(2).map(|i| bars[i].close);
            ui.horizontal(|ui| {
                components::stat_tile(
                    ui,
                    "LAST CLOSE",
                    &utils::format_inr(last.close),
                    theme::TEXT_PRIMARY,
                );
                if let Some(prev) = prev_close {
                    let pct = (last.close - prev) / prev * 100.0;
                    let color = if pct >= 0.0 { theme::BULL } else { theme::BEAR };
                    components::stat_tile(ui, "DAY CHANGE", &utils::format_percent(pct), color);
                }
                components::stat_tile(
                    ui,
                    "VOLUME",
                    &utils::format_volume(last.volume),
                    theme::TEXT_SECONDARY,
                );
                components::stat_tile(
                    ui,
                    "AS OF",
                    &utils::format_bar_date(last.ts),
                    theme::TEXT_SECONDARY,
                );
            });
            ui.add_space(theme::SPACING_MD);
        }

        // Sentiment read on the business summary
        match &profile_status {
            FetchStatus::Loading if profile.is_none() => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(
                        egui::RichText::new("Fetching company profile...")
                            .color(theme::TEXT_DIM),
                    );
                });
            }
            FetchStatus::Failed(e) if profile.is_none() => {
                components::error_panel(ui, &format!("Profile unavailable: {}", e));
            }
            FetchStatus::Ready => match (&profile, polarity) {
                (Some(p), Some(score)) => {
                    components::sentiment_banner(ui, score);
                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        if let (Some(sector), Some(industry)) = (&p.sector, &p.industry) {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(format!("{} • {}", sector, industry))
                                        .size(theme::FONT_SMALL)
                                        .color(theme::TEXT_MUTED),
                                )
                                .selectable(false),
                            );
                        }
                        if let Some(website) = p.website.clone() {
                            if ui
                                .add(
                                    egui::Button::new(
                                        egui::RichText::new(format!(
                                            "{} {}",
                                            egui_phosphor::regular::GLOBE,
                                            website
                                        ))
                                        .size(theme::FONT_SMALL)
                                        .color(theme::ACCENT),
                                    )
                                    .frame(false),
                                )
                                .clicked()
                            {
                                if let Err(e) = open::that(&website) {
                                    warn!(error = %e, "Failed to open website");
                                }
                            }
                        }
                    });
                }
                _ => {
                    components::error_panel(ui, "No business summary available for this stock.");
                }
            },
            _ => {
                if let (Some(_), Some(score)) = (&profile, polarity) {
                    components::sentiment_banner(ui, score);
                }
            }
        }

        ui.add_space(theme::SPACING_MD);

        // Range control, MA badge, refresh
        ui.horizontal(|ui| {
            let labels: Vec<&str> = ChartRange::ALL.iter().map(|r| r.label()).collect();
            let selected = ChartRange::ALL
                .iter()
                .position(|r| *r == self.chart_range)
                .unwrap_or(ChartRange::ALL.len() - 1);
            if let Some(clicked) = theme::segmented_strip(ui, &labels, selected, 44.0) {
                self.chart_range = ChartRange::ALL[clicked];
                self.save_settings();
            }
            ui.add_space(8.0);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!("SMA {}", self.ma_window))
                        .size(theme::FONT_SMALL)
                        .color(theme::SMA_LINE),
                )
                .selectable(false),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(egui_phosphor::regular::ARROWS_CLOCKWISE).frame(false))
                    .on_hover_text("Refresh history and profile")
                    .clicked()
                {
                    refresh = true;
                }
                if hist_status == FetchStatus::Loading {
                    ui.spinner();
                }
            });
        });

        if let Some(warning) = &warning {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!(
                        "{} Refresh failed, showing cached bars: {}",
                        egui_phosphor::regular::WARNING,
                        warning
                    ))
                    .size(theme::FONT_SMALL)
                    .color(theme::STATUS_WARNING),
                )
                .selectable(false),
            );
        }

        ui.add_space(4.0);

        // Candlestick chart with the SMA overlay
        match &hist_status {
            FetchStatus::Failed(e) => components::error_panel(ui, e),
            FetchStatus::Loading if bars.is_empty() => {
                ui.add_space(24.0);
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    ui.spinner();
                    ui.label(
                        egui::RichText::new("Fetching daily history...").color(theme::TEXT_DIM),
                    );
                });
            }
            _ if bars.is_empty() => {
                ui.label(egui::RichText::new("No bars to plot").color(theme::TEXT_DIM));
            }
            _ => {
                let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
                let sma_full = indicators::sma(&closes, self.ma_window);
                let visible = chart::visible_slice(&bars, self.chart_range);
                let start = bars.len() - visible.len();

                let height = (ui.available_height() - 8.0).max(260.0);
                let (rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), height),
                    egui::Sense::hover(),
                );
                chart::draw_candles(ui, rect, visible, &sma_full[start..]);
            }
        }

        if refresh {
            self.fetch_history(ctx);
            self.fetch_profile(ctx);
        }
    }
}

// ============================================================================
// NEWS VIEW
// ============================================================================

impl App {
    fn render_news(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (status, headlines, news_warning) = {
            let slot = self.news.lock().unwrap();
            (
                slot.status.clone(),
                slot.headlines.clone(),
                slot.warning.clone(),
            )
        };

        let mut refresh = false;
        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Top finance headlines")
                        .size(theme::FONT_BODY)
                        .strong(),
                )
                .selectable(false),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(egui_phosphor::regular::ARROWS_CLOCKWISE).frame(false))
                    .on_hover_text("Refresh headlines")
                    .clicked()
                {
                    refresh = true;
                }
                if status == FetchStatus::Loading {
                    ui.spinner();
                }
            });
        });

        if let Some(warning) = &news_warning {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!(
                        "{} Refresh failed, showing earlier headlines: {}",
                        egui_phosphor::regular::WARNING,
                        warning
                    ))
                    .size(theme::FONT_SMALL)
                    .color(theme::STATUS_WARNING),
                )
                .selectable(false),
            );
        }
        ui.add_space(theme::SPACING_MD);

        match &status {
            FetchStatus::Failed(e) => components::error_panel(ui, e),
            FetchStatus::Loading if headlines.is_empty() => {
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    ui.add_space(24.0);
                    ui.spinner();
                    ui.label(
                        egui::RichText::new("Fetching headlines...").color(theme::TEXT_DIM),
                    );
                });
            }
            _ if headlines.is_empty() => {
                ui.label(egui::RichText::new("No headlines right now").color(theme::TEXT_DIM));
            }
            _ => {
                use egui_extras::{Column, TableBuilder};
                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::remainder())
                    .column(Column::auto().at_least(120.0))
                    .column(Column::auto().at_least(150.0))
                    .header(22.0, |mut header| {
                        for title in ["Headline", "Source", "Published"] {
                            header.col(|ui| {
                                ui.add(
                                    egui::Label::new(
                                        egui::RichText::new(title)
                                            .size(theme::FONT_SMALL)
                                            .color(theme::TEXT_DIM),
                                    )
                                    .selectable(false),
                                );
                            });
                        }
                    })
                    .body(|mut body| {
                        for headline in &headlines {
                            body.row(30.0, |mut row| {
                                row.col(|ui| {
                                    let resp = ui
                                        .add(
                                            egui::Label::new(
                                                egui::RichText::new(&headline.title)
                                                    .color(theme::TEXT_SECONDARY),
                                            )
                                            .sense(egui::Sense::click())
                                            .truncate(),
                                        )
                                        .on_hover_text("Open in browser");
                                    if resp.hovered() {
                                        ui.ctx()
                                            .set_cursor_icon(egui::CursorIcon::PointingHand);
                                    }
                                    if resp.clicked() {
                                        if let Err(e) = open::that(&headline.link) {
                                            warn!(error = %e, "Failed to open headline");
                                        }
                                    }
                                });
                                row.col(|ui| {
                                    ui.add(
                                        egui::Label::new(
                                            egui::RichText::new(
                                                headline.source.as_deref().unwrap_or("-"),
                                            )
                                            .size(theme::FONT_SMALL)
                                            .color(theme::TEXT_MUTED),
                                        )
                                        .selectable(false),
                                    );
                                });
                                row.col(|ui| {
                                    ui.add(
                                        egui::Label::new(
                                            egui::RichText::new(
                                                headline.published.as_deref().unwrap_or("-"),
                                            )
                                            .size(theme::FONT_SMALL)
                                            .color(theme::TEXT_DIM),
                                        )
                                        .selectable(false),
                                    );
                                });
                            });
                        }
                    });
            }
        }

        if refresh {
            self.fetch_news(ctx, true);
        }
    }
}

// ============================================================================
// LIVE VIEW
// ============================================================================

impl App {
    fn render_live(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.selected.is_none() {
            ui.add_space(40.0);
            ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new("Pick a symbol from the sidebar to watch live")
                        .color(theme::TEXT_DIM),
                );
            });
            return;
        }

        let (running, last_price, prev_close, error, samples, signal, trend_len, last_move, prices, polls, last_poll) = {
            let slot = self.live.lock().unwrap();
            (
                slot.running,
                slot.last_price,
                slot.prev_close,
                slot.error.clone(),
                slot.trend.samples().collect::<Vec<i8>>(),
                slot.trend.signal(),
                slot.trend.len(),
                slot.last_move,
                slot.prices.clone(),
                slot.polls,
                slot.last_poll,
            )
        };

        let mut start = false;
        let mut stop = false;
        ui.horizontal(|ui| {
            if running {
                if ui
                    .add(theme::button_danger(format!(
                        "{}  Stop watch",
                        egui_phosphor::regular::STOP
                    )))
                    .clicked()
                {
                    stop = true;
                }
            } else if ui
                .add(theme::button_accent(format!(
                    "{}  Start watch",
                    egui_phosphor::regular::PLAY
                )))
                .clicked()
            {
                start = true;
            }
            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!("Polling every {}s", self.poll_secs))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
        });
        ui.add_space(theme::SPACING_MD);

        if let Some(e) = &error {
            // The error takes the price's spot until a poll succeeds again
            components::error_panel(ui, &format!("Last poll failed: {}", e));
        } else {
            match last_price {
                Some(price) => {
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(utils::format_inr(price))
                                    .size(34.0)
                                    .strong()
                                    .color(theme::TEXT_PRIMARY),
                            )
                            .selectable(false),
                        );
                        if let Some(mv) = last_move {
                            let (icon, color) = components::move_marker(mv);
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(icon).size(26.0).color(color),
                                )
                                .selectable(false),
                            );
                        }
                        if let Some(prev) = prev_close {
                            let pct = (price - prev) / prev * 100.0;
                            let color = if pct >= 0.0 { theme::BULL } else { theme::BEAR };
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(format!(
                                        "{} vs prev close",
                                        utils::format_percent(pct)
                                    ))
                                    .size(theme::FONT_LABEL)
                                    .color(color),
                                )
                                .selectable(false),
                            );
                        }
                    });
                }
                None if running => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(
                            egui::RichText::new("Waiting for the first quote...")
                                .color(theme::TEXT_DIM),
                        );
                    });
                }
                None => {
                    ui.label(
                        egui::RichText::new("Start the watch to poll live quotes")
                            .color(theme::TEXT_DIM),
                    );
                }
            }
        }

        ui.add_space(theme::SPACING_MD);

        // Trend buffer and signal
        theme::card_frame().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("TREND")
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
                for &sample in &samples {
                    let (icon, color) = components::move_marker(sample);
                    ui.add(
                        egui::Label::new(egui::RichText::new(icon).size(18.0).color(color))
                            .selectable(false),
                    );
                }
                for _ in samples.len()..TREND_SAMPLES {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(egui_phosphor::regular::DOT_OUTLINE)
                                .size(18.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                }
                ui.add_space(12.0);
                if trend_len < TREND_SAMPLES {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(format!(
                                "Collecting moves ({}/{})",
                                trend_len, TREND_SAMPLES
                            ))
                            .color(theme::TEXT_MUTED),
                        )
                        .selectable(false),
                    );
                } else {
                    let color = components::signal_color(signal);
                    ui.add(
                        egui::Label::new(egui::RichText::new(signal.label()).strong().color(color))
                            .selectable(false),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(signal.advice())
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_MUTED),
                        )
                        .selectable(false),
                    );
                }
            });
        });

        ui.add_space(theme::SPACING_MD);

        // Session sparkline
        let height = 120.0_f32.min(ui.available_height() - 30.0).max(60.0);
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), height),
            egui::Sense::hover(),
        );
        chart::draw_sparkline(ui, rect, &prices);

        ui.add_space(theme::SPACING_SM);
        let poll_line = match last_poll {
            Some(at) => format!("{} polls • last at {} IST", polls, utils::format_ist_time(at)),
            None => format!("{} polls", polls),
        };
        ui.add(
            egui::Label::new(
                egui::RichText::new(poll_line)
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_DIM),
            )
            .selectable(false),
        );

        if stop {
            self.stop_live();
        }
        if start {
            self.start_live(ctx);
        }
    }
}

// ============================================================================
// SETTINGS MODAL AND TOAST
// ============================================================================

impl App {
    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(0x1a, 0x1a, 0x1e))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0x2a, 0x2a, 0x2e)))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                ui.set_width(300.0);

                // Title bar with close button
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new("Settings").size(16.0).strong())
                            .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let close_size = 24.0;
                        let (rect, response) = ui.allocate_exact_size(
                            egui::vec2(close_size, close_size),
                            egui::Sense::click(),
                        );
                        let close_color = if response.hovered() {
                            ui.painter().rect_filled(rect, 4.0, theme::BG_SURFACE);
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            theme::STATUS_ERROR
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::X,
                            egui::FontId::proportional(16.0),
                            close_color,
                        );
                        if response.clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Chart").size(13.0).color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                ui.horizontal(|ui| {
                    ui.label("Moving average window (days)");
                    let resp = ui.add(
                        egui::DragValue::new(&mut self.ma_window)
                            .range(MA_WINDOW_MIN..=MA_WINDOW_MAX)
                            .speed(1),
                    );
                    if resp.changed() {
                        self.save_settings();
                    }
                });

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Live watch")
                            .size(13.0)
                            .color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                ui.horizontal(|ui| {
                    ui.label("Poll interval (seconds)");
                    let resp = ui.add(
                        egui::DragValue::new(&mut self.poll_secs)
                            .range(POLL_SECS_MIN..=POLL_SECS_MAX)
                            .speed(1),
                    );
                    if resp.changed() {
                        self.save_settings();
                        // A running watch picks up the new cadence on restart
                        if self.live.lock().unwrap().running {
                            self.start_live(ctx);
                        }
                    }
                });
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }

    fn render_toast(&mut self, ctx: &egui::Context) {
        // Bottom-right of central panel, 3s visible then fade, pause on hover
        if let (Some(msg), Some(panel_rect)) = (self.toast_message.clone(), self.central_panel_rect)
        {
            let visible_duration = 3.0;
            let fade_duration = 0.5;
            let total_duration = visible_duration + fade_duration;
            let margin = 12.0;

            let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);

            let response = egui::Area::new(egui::Id::new("status_toast"))
                .fixed_pos(toast_pos)
                .pivot(egui::Align2::RIGHT_BOTTOM)
                .show(ctx, |ui| {
                    let elapsed = self
                        .toast_start
                        .map(|t| t.elapsed().as_secs_f32())
                        .unwrap_or(0.0);
                    let alpha = if elapsed > visible_duration {
                        (total_duration - elapsed) / fade_duration
                    } else {
                        1.0
                    };

                    egui::Frame::new()
                        .fill(egui::Color32::from_rgba_unmultiplied(
                            0x1a,
                            0x1a,
                            0x1e,
                            (230.0 * alpha) as u8,
                        ))
                        .stroke(egui::Stroke::new(
                            1.0,
                            egui::Color32::from_rgba_unmultiplied(
                                theme::ACCENT.r(),
                                theme::ACCENT.g(),
                                theme::ACCENT.b(),
                                (100.0 * alpha) as u8,
                            ),
                        ))
                        .corner_radius(6.0)
                        .inner_margin(egui::Margin::symmetric(16, 10))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(&msg).color(
                                egui::Color32::from_rgba_unmultiplied(
                                    255,
                                    255,
                                    255,
                                    (255.0 * alpha) as u8,
                                ),
                            ));
                        });
                });

            // Pause timer while hovering
            if response.response.hovered() {
                self.toast_start = Some(std::time::Instant::now());
            }

            let elapsed = self
                .toast_start
                .map(|t| t.elapsed().as_secs_f32())
                .unwrap_or(0.0);
            if elapsed >= total_duration {
                self.toast_message = None;
                self.toast_start = None;
            } else {
                ctx.request_repaint();
            }
        }
    }
}
