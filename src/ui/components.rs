//! Reusable UI components
//!
//! Standalone painted widgets used across the views.

use crate::indicators::Signal;
use crate::sentiment::Verdict;
use crate::theme;
use eframe::egui;

/// Arrow glyph and color for a move sample (-1 down, 0 flat, +1 up)
pub fn move_marker(sample: i8) -> (&'static str, egui::Color32) {
    match sample.signum() {
        1 => (egui_phosphor::regular::ARROW_UP_RIGHT, theme::BULL),
        -1 => (egui_phosphor::regular::ARROW_DOWN_RIGHT, theme::BEAR),
        _ => (egui_phosphor::regular::ARROW_RIGHT, theme::FLAT),
    }
}

/// Color for a live trading signal
pub fn signal_color(signal: Signal) -> egui::Color32 {
    match signal {
        Signal::Buy => theme::BULL,
        Signal::Sell => theme::BEAR,
        Signal::Hold => theme::STATUS_WARNING,
    }
}

/// (icon, color) for a sentiment verdict banner
pub fn verdict_style(verdict: Verdict) -> (&'static str, egui::Color32) {
    match verdict {
        Verdict::Positive => (egui_phosphor::regular::SMILEY, theme::STATUS_SUCCESS),
        Verdict::Negative => (egui_phosphor::regular::SMILEY_SAD, theme::STATUS_ERROR),
        Verdict::Neutral => (egui_phosphor::regular::SMILEY_MEH, theme::STATUS_WARNING),
    }
}

/// Small labelled value tile used across the Analysis and Live views
pub fn stat_tile(ui: &mut egui::Ui, label: &str, value: &str, color: egui::Color32) {
    theme::section_frame().show(ui, |ui| {
        ui.set_min_width(110.0);
        ui.vertical(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(label)
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .selectable(false),
            );
            ui.add(
                egui::Label::new(egui::RichText::new(value).size(16.0).strong().color(color))
                    .selectable(false),
            );
        });
    });
}

/// Rounded sector badge
pub fn sector_chip(ui: &mut egui::Ui, sector: &str) {
    let (bg, text) = theme::sector_colors(sector);
    let font = egui::FontId::proportional(10.0);
    let galley = ui.fonts(|f| f.layout_no_wrap(sector.to_string(), font.clone(), text));
    let size = egui::vec2(galley.rect.width() + 12.0, 16.0);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, 8.0, bg);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            sector,
            font,
            text,
        );
    }
}

/// Watchlist star tint. Phosphor variants share codepoints within one font
/// family, so watchlist state reads by color, not glyph.
pub fn star_color(watchlisted: bool) -> egui::Color32 {
    if watchlisted {
        theme::STAR_FILLED
    } else {
        theme::STAR_EMPTY
    }
}

/// Sentiment banner: verdict headline, score, and advice line
pub fn sentiment_banner(ui: &mut egui::Ui, polarity: f64) {
    let verdict = Verdict::from_polarity(polarity);
    let (icon, color) = verdict_style(verdict);

    egui::Frame::new()
        .fill(egui::Color32::from_rgba_unmultiplied(
            color.r(),
            color.g(),
            color.b(),
            12,
        ))
        .stroke(egui::Stroke::new(1.0, color))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(icon).size(22.0).color(color));
                ui.vertical(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{}  ({:+.2})",
                            verdict.headline(),
                            polarity
                        ))
                        .strong()
                        .color(color),
                    );
                    ui.label(
                        egui::RichText::new(verdict.advice())
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );
                });
            });
        });
}

/// Inline error panel used where fetched content would have been
pub fn error_panel(ui: &mut egui::Ui, message: &str) {
    egui::Frame::new()
        .fill(egui::Color32::from_rgb(0x2d, 0x0a, 0x0a))
        .corner_radius(theme::RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(10))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0x7f, 0x1d, 0x1d)))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let text = format!("{}  {}", egui_phosphor::regular::WARNING, message);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(text).color(egui::Color32::from_rgb(0xfc, 0xa5, 0xa5)),
                )
                .wrap(),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_states_read_by_color() {
        // Same glyph either way, so the tint must carry the state
        assert_eq!(star_color(true), theme::STAR_FILLED);
        assert_eq!(star_color(false), theme::STAR_EMPTY);
        assert_ne!(star_color(true), star_color(false));
    }

    #[test]
    fn signal_colors_are_distinct() {
        assert_ne!(signal_color(Signal::Buy), signal_color(Signal::Sell));
        assert_ne!(signal_color(Signal::Buy), signal_color(Signal::Hold));
    }
}
