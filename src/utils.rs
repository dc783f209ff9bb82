//! Utility functions

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::path::PathBuf;

/// Indian Standard Time, +05:30
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
}

// Candlestick mark — for sidebar logo (wide display)
pub const LOGO_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 180 120"><defs><style>.up{fill:#34d399}.dn{fill:#f87171}.ma{stroke:#f59e0b;stroke-width:5;fill:none;stroke-linecap:round}</style></defs><rect class="dn" x="14" y="38" width="16" height="44" rx="3"/><rect class="dn" x="20" y="22" width="4" height="74"/><rect class="up" x="54" y="50" width="16" height="40" rx="3"/><rect class="up" x="60" y="36" width="4" height="66"/><rect class="dn" x="94" y="30" width="16" height="36" rx="3"/><rect class="up" x="100" y="18" width="4" height="60"/><rect class="up" x="134" y="14" width="16" height="48" rx="3"/><rect class="up" x="140" y="4" width="4" height="68"/><path class="ma" d="M8,92 C48,86 78,74 106,52 C126,36 150,26 172,22"/></svg>"#;

// Square viewBox — for window/taskbar icons
pub const ICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 120 120"><defs><style>.up{fill:#34d399}.dn{fill:#f87171}.ma{stroke:#f59e0b;stroke-width:5;fill:none;stroke-linecap:round}</style></defs><rect class="dn" x="12" y="40" width="16" height="40" rx="3"/><rect class="dn" x="18" y="26" width="4" height="66"/><rect class="up" x="52" y="48" width="16" height="38" rx="3"/><rect class="up" x="58" y="34" width="4" height="62"/><rect class="up" x="92" y="20" width="16" height="44" rx="3"/><rect class="up" x="98" y="8" width="4" height="66"/><path class="ma" d="M6,94 C36,88 60,70 82,50 C96,38 106,30 114,24"/></svg>"#;

/// Rasterize the logo SVG at the given width, preserving aspect ratio.
pub fn rasterize_logo(width: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).unwrap();
    let svg_size = tree.size();
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), width, height)
}

/// Rasterize the icon SVG to a square image (for window/taskbar icons).
pub fn rasterize_logo_square(size: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(ICON_SVG, &resvg::usvg::Options::default()).unwrap();
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), size, size)
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the app data directory path
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Nifty Lens")
}

/// Percent-encode a ticker for use in a URL path ("M&M.NS" -> "M%26M.NS")
pub fn encode_symbol(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    for b in code.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Format a rupee amount with Indian digit grouping ("₹12,34,567.89")
pub fn format_inr(value: f64) -> String {
    let negative = value < 0.0;
    // Round once in paise so a fractional carry lands in the rupee part
    let total_paise = (value.abs() * 100.0).round() as u64;
    let grouped = group_indian(total_paise / 100);
    let paise = total_paise % 100;
    if negative {
        format!("-₹{}.{:02}", grouped, paise)
    } else {
        format!("₹{}.{:02}", grouped, paise)
    }
}

/// Indian grouping: last three digits, then groups of two
fn group_indian(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<String> = Vec::new();
    let head_bytes = head.as_bytes();
    let mut i = head_bytes.len();
    while i > 0 {
        let start = i.saturating_sub(2);
        groups.push(head[start..i].to_string());
        i = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Compact volume in Indian units: crore, lakh, or plain
pub fn format_volume(volume: i64) -> String {
    const LAKH: f64 = 100_000.0;
    const CRORE: f64 = 10_000_000.0;
    let v = volume as f64;
    if v >= CRORE {
        format!("{:.2} Cr", v / CRORE)
    } else if v >= LAKH {
        format!("{:.2} L", v / LAKH)
    } else {
        group_indian(volume.max(0) as u64)
    }
}

/// Signed percent with two decimals ("+1.24%")
pub fn format_percent(pct: f64) -> String {
    format!("{:+.2}%", pct)
}

/// Bar timestamp rendered as an IST calendar date ("24 Aug 2026")
pub fn format_bar_date(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0) {
        chrono::LocalResult::Single(dt) => {
            dt.with_timezone(&ist()).format("%d %b %Y").to_string()
        }
        _ => "-".to_string(),
    }
}

/// Year and month of a bar timestamp in IST, for month-boundary axis ticks
pub fn ist_year_month(ts: i64) -> (i32, u32) {
    use chrono::Datelike;
    match Utc.timestamp_opt(ts, 0) {
        chrono::LocalResult::Single(dt) => {
            let local = dt.with_timezone(&ist());
            (local.year(), local.month())
        }
        _ => (0, 0),
    }
}

/// Short month label for axis ticks ("Aug")
pub fn month_label(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&ist()).format("%b").to_string(),
        _ => String::new(),
    }
}

/// Wall-clock time in IST ("14:03:27")
pub fn format_ist_time(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&ist()).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_encoding_escapes_ampersand() {
        assert_eq!(encode_symbol("M&M.NS"), "M%26M.NS");
        assert_eq!(encode_symbol("RELIANCE.NS"), "RELIANCE.NS");
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1000), "1,000");
        assert_eq!(group_indian(100_000), "1,00,000");
        assert_eq!(group_indian(12_345_678), "1,23,45,678");
    }

    #[test]
    fn inr_formatting() {
        assert_eq!(format_inr(1234567.891), "₹12,34,567.89");
        assert_eq!(format_inr(0.5), "₹0.50");
        assert_eq!(format_inr(-250.0), "-₹250.00");
        // A fraction that rounds to a full rupee must carry
        assert_eq!(format_inr(1234.999), "₹1,235.00");
        assert_eq!(format_inr(99999.999), "₹1,00,000.00");
    }

    #[test]
    fn volume_units() {
        assert_eq!(format_volume(532), "532");
        assert_eq!(format_volume(250_000), "2.50 L");
        assert_eq!(format_volume(35_000_000), "3.50 Cr");
    }

    #[test]
    fn percent_is_signed() {
        assert_eq!(format_percent(1.237), "+1.24%");
        assert_eq!(format_percent(-0.5), "-0.50%");
    }

    #[test]
    fn bar_dates_use_ist() {
        // 2023-06-30 18:45 UTC is 2023-07-01 00:15 IST
        assert_eq!(format_bar_date(1_688_150_700), "01 Jul 2023");
        assert_eq!(ist_year_month(1_688_150_700), (2023, 7));
    }
}
