//! Common types and data structures

use serde::Deserialize;

/// One NSE equity in the tracked universe
#[derive(Debug, Clone)]
pub struct Equity {
    pub code: String,
    pub name: String,
    pub sector: String,
    pub watchlisted: bool,
}

/// One daily OHLCV bar, timestamp in epoch seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBar {
    pub ts: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Company profile from the quote summary endpoint
#[derive(Debug, Clone)]
pub struct CompanyProfile {
    pub symbol: String,
    pub summary: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub fetched_at: i64,
}

/// Status for a background fetch slot
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Shared slot for the selected symbol's daily history
#[derive(Default)]
pub struct HistorySlot {
    pub symbol: String,
    pub status: FetchStatus,
    pub bars: Vec<DailyBar>,
    /// Set when a refresh failed but cached bars are still shown
    pub warning: Option<String>,
}

/// Shared slot for the selected symbol's profile and sentiment
#[derive(Default)]
pub struct ProfileSlot {
    pub symbol: String,
    pub status: FetchStatus,
    pub profile: Option<CompanyProfile>,
    pub polarity: Option<f64>,
}

/// A single finance headline
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub title: String,
    pub link: String,
    pub source: Option<String>,
    pub published: Option<String>,
}

/// Shared slot for the headline feed
#[derive(Default)]
pub struct NewsSlot {
    pub status: FetchStatus,
    pub headlines: Vec<Headline>,
    pub warning: Option<String>,
}

/// Shared state for the live watch loop
#[derive(Default)]
pub struct LiveSlot {
    pub symbol: String,
    pub running: bool,
    pub last_price: Option<f64>,
    pub prev_close: Option<f64>,
    pub error: Option<String>,
    pub trend: crate::indicators::TrendWindow,
    pub last_move: Option<i8>,
    pub prices: Vec<f64>,
    pub polls: u64,
    pub last_poll: Option<chrono::DateTime<chrono::Utc>>,
}

/// Column to sort the symbol list by
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Code,
    Name,
    Sector,
}

/// Sort direction for the symbol list
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Watchlist filter segments
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchFilter {
    #[default]
    All,
    Watchlist,
    Others,
}

/// Central panel views
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analysis,
    News,
    Live,
}

/// Visible span of the cached year of bars
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartRange {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
}

impl ChartRange {
    pub const ALL: [ChartRange; 4] = [
        ChartRange::OneMonth,
        ChartRange::ThreeMonths,
        ChartRange::SixMonths,
        ChartRange::OneYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartRange::OneMonth => "1M",
            ChartRange::ThreeMonths => "3M",
            ChartRange::SixMonths => "6M",
            ChartRange::OneYear => "1Y",
        }
    }

    /// Key stored in settings.json
    pub fn key(self) -> &'static str {
        match self {
            ChartRange::OneMonth => "1mo",
            ChartRange::ThreeMonths => "3mo",
            ChartRange::SixMonths => "6mo",
            ChartRange::OneYear => "1y",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "1mo" => ChartRange::OneMonth,
            "3mo" => ChartRange::ThreeMonths,
            "6mo" => ChartRange::SixMonths,
            _ => ChartRange::OneYear,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            ChartRange::OneMonth => 30,
            ChartRange::ThreeMonths => 91,
            ChartRange::SixMonths => 182,
            ChartRange::OneYear => 365,
        }
    }
}

// ============================================================================
// WIRE FORMATS (Yahoo-style chart and quote summary JSON)
// ============================================================================

#[derive(Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartOuter,
}

#[derive(Deserialize)]
pub struct ChartOuter {
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Deserialize)]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(rename = "regularMarketPrice", default)]
    pub regular_market_price: Option<f64>,
    #[serde(rename = "chartPreviousClose", default)]
    pub chart_previous_close: Option<f64>,
}

#[derive(Deserialize)]
pub struct ChartIndicators {
    pub quote: Vec<QuoteArrays>,
}

/// Five parallel arrays; entries are null where the source dropped a row
#[derive(Deserialize)]
pub struct QuoteArrays {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<i64>>,
}

#[derive(Deserialize)]
pub struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummaryOuter,
}

#[derive(Deserialize)]
pub struct QuoteSummaryOuter {
    pub result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Deserialize)]
pub struct QuoteSummaryResult {
    #[serde(rename = "assetProfile")]
    pub asset_profile: Option<AssetProfile>,
}

#[derive(Deserialize)]
pub struct AssetProfile {
    #[serde(rename = "longBusinessSummary", default)]
    pub long_business_summary: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}
