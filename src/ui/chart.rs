//! Candlestick chart rendering: pure geometry plus an egui painter layer

use crate::theme;
use crate::types::{ChartRange, DailyBar};
use crate::utils;
use eframe::egui;

/// Fraction of the visible price span added above and below
const RANGE_PAD: f64 = 0.04;

/// Body width as a fraction of the per-bar slot
const BODY_FRACTION: f32 = 0.7;

// ============================================================================
// GEOMETRY (pure, tested)
// ============================================================================

/// Slice of bars inside the selected range, measured back from the last bar
pub fn visible_slice(bars: &[DailyBar], range: ChartRange) -> &[DailyBar] {
    let Some(last) = bars.last() else {
        return bars;
    };
    let cutoff = last.ts - range.days() * 86_400;
    let start = bars.partition_point(|b| b.ts < cutoff);
    &bars[start..]
}

/// Price axis bounds: visible min low to max high, padded. A flat series
/// gets a degenerate-range pad so the mapping stays total.
pub fn price_bounds(bars: &[DailyBar]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for bar in bars {
        min = min.min(bar.low);
        max = max.max(bar.high);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    let pad = if span > 0.0 {
        span * RANGE_PAD
    } else {
        (max.abs() * RANGE_PAD).max(1.0)
    };
    (min - pad, max + pad)
}

/// Round gridline step covering the span in roughly `target` divisions
pub fn nice_step(span: f64, target: usize) -> f64 {
    debug_assert!(target > 0);
    if span <= 0.0 {
        return 1.0;
    }
    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Maps prices and bar indices into a plot rect
#[derive(Clone, Copy)]
pub struct PlotMap {
    pub rect: egui::Rect,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl PlotMap {
    pub fn new(rect: egui::Rect, bounds: (f64, f64), count: usize) -> Self {
        Self {
            rect,
            min: bounds.0,
            max: bounds.1,
            count: count.max(1),
        }
    }

    pub fn y_of(&self, price: f64) -> f32 {
        let mut t = (price - self.min) / (self.max - self.min);
        if !t.is_finite() {
            t = 0.0;
        }
        self.rect.bottom() - t.clamp(0.0, 1.0) as f32 * self.rect.height()
    }

    pub fn slot_width(&self) -> f32 {
        self.rect.width() / self.count as f32
    }

    pub fn x_center(&self, index: usize) -> f32 {
        self.rect.left() + (index as f32 + 0.5) * self.slot_width()
    }

    pub fn body_width(&self) -> f32 {
        (self.slot_width() * BODY_FRACTION).max(1.0)
    }

    /// Bar index under an x position, if inside the rect
    pub fn index_at(&self, x: f32) -> Option<usize> {
        if x < self.rect.left() || x > self.rect.right() {
            return None;
        }
        let i = ((x - self.rect.left()) / self.slot_width()) as usize;
        Some(i.min(self.count - 1))
    }
}

/// Indices where a new IST month starts, for x-axis labels
pub fn month_starts(bars: &[DailyBar]) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut last_month = None;
    for (i, bar) in bars.iter().enumerate() {
        let ym = utils::ist_year_month(bar.ts);
        if last_month != Some(ym) {
            if last_month.is_some() {
                starts.push(i);
            }
            last_month = Some(ym);
        }
    }
    starts
}

// ============================================================================
// PAINTING
// ============================================================================

/// Draw the candlestick chart with an optional SMA overlay into `rect`.
/// `sma` must be aligned 1:1 with `bars` (slots may be None during warmup).
pub fn draw_candles(
    ui: &mut egui::Ui,
    rect: egui::Rect,
    bars: &[DailyBar],
    sma: &[Option<f64>],
) {
    if bars.is_empty() {
        return;
    }
    let axis_w = 56.0;
    let axis_h = 18.0;
    let plot_rect = egui::Rect::from_min_max(
        rect.min,
        egui::pos2(rect.max.x - axis_w, rect.max.y - axis_h),
    );
    let map = PlotMap::new(plot_rect, price_bounds(bars), bars.len());
    let painter = ui.painter_at(rect);

    // Horizontal gridlines at round price steps with ₹ labels
    let step = nice_step(map.max - map.min, 6);
    let mut price = (map.min / step).ceil() * step;
    while price <= map.max {
        let y = map.y_of(price);
        painter.line_segment(
            [egui::pos2(plot_rect.left(), y), egui::pos2(plot_rect.right(), y)],
            egui::Stroke::new(1.0, theme::CHART_GRID),
        );
        painter.text(
            egui::pos2(plot_rect.right() + 6.0, y),
            egui::Align2::LEFT_CENTER,
            format!("₹{:.0}", price),
            egui::FontId::proportional(10.0),
            theme::TEXT_DIM,
        );
        price += step;
    }

    // Month boundary labels along the x-axis
    for i in month_starts(bars) {
        let x = map.x_center(i);
        painter.line_segment(
            [
                egui::pos2(x, plot_rect.top()),
                egui::pos2(x, plot_rect.bottom()),
            ],
            egui::Stroke::new(1.0, theme::CHART_GRID),
        );
        painter.text(
            egui::pos2(x, rect.bottom() - 2.0),
            egui::Align2::CENTER_BOTTOM,
            utils::month_label(bars[i].ts),
            egui::FontId::proportional(10.0),
            theme::TEXT_DIM,
        );
    }

    // Candles: wick low->high, body open<->close with minimum 1px height
    for (i, bar) in bars.iter().enumerate() {
        let x = map.x_center(i);
        let color = if bar.close >= bar.open {
            theme::BULL
        } else {
            theme::BEAR
        };

        painter.line_segment(
            [
                egui::pos2(x, map.y_of(bar.low)),
                egui::pos2(x, map.y_of(bar.high)),
            ],
            egui::Stroke::new(1.0, color),
        );

        let y_open = map.y_of(bar.open);
        let y_close = map.y_of(bar.close);
        let top = y_open.min(y_close);
        let height = (y_open - y_close).abs().max(1.0);
        let body = egui::Rect::from_min_size(
            egui::pos2(x - map.body_width() / 2.0, top),
            egui::vec2(map.body_width(), height),
        );
        painter.rect_filled(body, 0.0, color);
    }

    // SMA polyline over slots where it exists
    let mut segment: Vec<egui::Pos2> = Vec::new();
    for (i, value) in sma.iter().enumerate().take(bars.len()) {
        match value {
            Some(v) => segment.push(egui::pos2(map.x_center(i), map.y_of(*v))),
            None => {
                if segment.len() > 1 {
                    painter.add(egui::Shape::line(
                        std::mem::take(&mut segment),
                        egui::Stroke::new(1.5, theme::SMA_LINE),
                    ));
                } else {
                    segment.clear();
                }
            }
        }
    }
    if segment.len() > 1 {
        painter.add(egui::Shape::line(
            segment,
            egui::Stroke::new(1.5, theme::SMA_LINE),
        ));
    }

    // Crosshair and tooltip on hover
    let response = ui.interact(plot_rect, ui.id().with("chart_hover"), egui::Sense::hover());
    if let Some(pos) = response.hover_pos() {
        if let Some(i) = map.index_at(pos.x) {
            let bar = &bars[i];
            let x = map.x_center(i);
            painter.line_segment(
                [
                    egui::pos2(x, plot_rect.top()),
                    egui::pos2(x, plot_rect.bottom()),
                ],
                egui::Stroke::new(1.0, theme::CROSSHAIR),
            );
            painter.line_segment(
                [
                    egui::pos2(plot_rect.left(), pos.y),
                    egui::pos2(plot_rect.right(), pos.y),
                ],
                egui::Stroke::new(1.0, theme::CROSSHAIR),
            );

            let mut lines = vec![
                utils::format_bar_date(bar.ts),
                format!("O {}", utils::format_inr(bar.open)),
                format!("H {}", utils::format_inr(bar.high)),
                format!("L {}", utils::format_inr(bar.low)),
                format!("C {}", utils::format_inr(bar.close)),
                format!("Vol {}", utils::format_volume(bar.volume)),
            ];
            if let Some(Some(v)) = sma.get(i) {
                lines.push(format!("SMA {}", utils::format_inr(*v)));
            }
            draw_tooltip(&painter, plot_rect, pos, &lines);
        }
    }
}

fn draw_tooltip(
    painter: &egui::Painter,
    plot_rect: egui::Rect,
    pos: egui::Pos2,
    lines: &[String],
) {
    let font = egui::FontId::proportional(11.0);
    let line_h = 15.0;
    let pad = 8.0;
    let width = 150.0;
    let height = lines.len() as f32 * line_h + pad * 2.0;

    // Keep the box inside the plot, flipping sides near the right edge
    let mut anchor = pos + egui::vec2(14.0, -height / 2.0);
    if anchor.x + width > plot_rect.right() {
        anchor.x = pos.x - width - 14.0;
    }
    anchor.y = anchor
        .y
        .clamp(plot_rect.top(), (plot_rect.bottom() - height).max(plot_rect.top()));

    let box_rect = egui::Rect::from_min_size(anchor, egui::vec2(width, height));
    painter.rect_filled(
        box_rect,
        theme::RADIUS_DEFAULT,
        egui::Color32::from_rgba_unmultiplied(0x12, 0x12, 0x14, 235),
    );
    painter.rect_stroke(
        box_rect,
        theme::RADIUS_DEFAULT,
        egui::Stroke::new(1.0, theme::BORDER_DEFAULT),
        egui::StrokeKind::Inside,
    );
    for (i, line) in lines.iter().enumerate() {
        let color = if i == 0 {
            theme::TEXT_PRIMARY
        } else {
            theme::TEXT_MUTED
        };
        painter.text(
            egui::pos2(box_rect.left() + pad, box_rect.top() + pad + i as f32 * line_h),
            egui::Align2::LEFT_TOP,
            line,
            font.clone(),
            color,
        );
    }
}

/// Minimal polyline of recent live prices, colored by overall direction
pub fn draw_sparkline(ui: &mut egui::Ui, rect: egui::Rect, prices: &[f64]) {
    let painter = ui.painter_at(rect);
    if prices.len() < 2 {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Waiting for polls...",
            egui::FontId::proportional(11.0),
            theme::TEXT_DIM,
        );
        return;
    }

    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };

    let points: Vec<egui::Pos2> = prices
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let x = rect.left() + i as f32 / (prices.len() - 1) as f32 * rect.width();
            let t = ((p - min) / span) as f32;
            egui::pos2(x, rect.bottom() - t * rect.height())
        })
        .collect();

    let color = if prices[prices.len() - 1] >= prices[0] {
        theme::BULL
    } else {
        theme::BEAR
    };
    painter.add(egui::Shape::line(points, egui::Stroke::new(1.5, color)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: i64, low: f64, high: f64) -> DailyBar {
        DailyBar {
            ts,
            open: low + (high - low) * 0.25,
            high,
            low,
            close: low + (high - low) * 0.75,
            volume: 1,
        }
    }

    #[test]
    fn bounds_pad_the_visible_extremes() {
        let bars = [bar(1, 90.0, 110.0), bar(2, 95.0, 120.0)];
        let (min, max) = price_bounds(&bars);
        assert!(min < 90.0);
        assert!(max > 120.0);
        let pad = (120.0 - 90.0) * RANGE_PAD;
        assert!((min - (90.0 - pad)).abs() < 1e-9);
        assert!((max - (120.0 + pad)).abs() < 1e-9);
    }

    #[test]
    fn flat_series_still_has_a_range() {
        let bars = [bar(1, 100.0, 100.0), bar(2, 100.0, 100.0)];
        let (min, max) = price_bounds(&bars);
        assert!(max > min);
    }

    #[test]
    fn empty_series_bounds_are_total() {
        let (min, max) = price_bounds(&[]);
        assert!(max > min);
    }

    #[test]
    fn y_mapping_is_monotonic_and_total() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 200.0));
        let map = PlotMap::new(rect, (100.0, 200.0), 10);
        assert!(map.y_of(100.0) > map.y_of(150.0));
        assert!(map.y_of(150.0) > map.y_of(200.0));
        // Out-of-range prices clamp instead of escaping the rect
        assert_eq!(map.y_of(50.0), rect.bottom());
        assert_eq!(map.y_of(500.0), rect.top());
        assert_eq!(map.y_of(f64::NAN), rect.bottom());
    }

    #[test]
    fn index_lookup_matches_centers() {
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 50.0));
        let map = PlotMap::new(rect, (0.0, 1.0), 4);
        for i in 0..4 {
            assert_eq!(map.index_at(map.x_center(i)), Some(i));
        }
        assert_eq!(map.index_at(-5.0), None);
        assert_eq!(map.index_at(105.0), None);
    }

    #[test]
    fn nice_steps_are_round() {
        assert_eq!(nice_step(100.0, 5), 20.0);
        assert_eq!(nice_step(7.0, 5), 2.0);
        assert_eq!(nice_step(0.35, 5), 0.1);
        assert_eq!(nice_step(0.0, 5), 1.0);
    }

    #[test]
    fn visible_slice_by_range() {
        let day = 86_400;
        let bars: Vec<DailyBar> = (0..365).map(|i| bar(i * day, 10.0, 11.0)).collect();
        assert_eq!(visible_slice(&bars, ChartRange::OneYear).len(), 365);
        let month = visible_slice(&bars, ChartRange::OneMonth);
        assert!(month.len() <= 31);
        assert_eq!(month.last(), bars.last());
    }

    #[test]
    fn visible_slice_of_empty_is_empty() {
        assert!(visible_slice(&[], ChartRange::OneMonth).is_empty());
    }

    #[test]
    fn month_starts_mark_boundaries() {
        // Two bars in June 2023, two in July (IST)
        let bars = [
            bar(1_686_000_000, 1.0, 2.0),
            bar(1_686_500_000, 1.0, 2.0),
            bar(1_688_500_000, 1.0, 2.0),
            bar(1_688_900_000, 1.0, 2.0),
        ];
        assert_eq!(month_starts(&bars), vec![2]);
    }
}
