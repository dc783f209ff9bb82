//! History and profile fetch logic

use super::App;
use crate::constants::*;
use crate::db::Database;
use crate::sentiment;
use crate::types::*;
use crate::utils::encode_symbol;
use chrono::Utc;
use eframe::egui;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Chart endpoint URL for a ticker
pub(crate) fn chart_url(code: &str, range: &str, interval: &str) -> String {
    format!(
        "{}/v8/finance/chart/{}?range={}&interval={}",
        QUOTE_HOST,
        encode_symbol(code),
        range,
        interval
    )
}

/// Quote summary (asset profile) endpoint URL for a ticker
pub(crate) fn profile_url(code: &str) -> String {
    format!(
        "{}/v10/finance/quoteSummary/{}?modules=assetProfile",
        QUOTE_HOST,
        encode_symbol(code)
    )
}

/// Zip the five parallel chart arrays into bars, skipping any index with a
/// missing field (dropped NaN rows upstream) and any OHLC-inconsistent bar.
/// Output is ascending by timestamp.
pub(crate) fn flatten_chart(result: &ChartResult) -> Vec<DailyBar> {
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };

    let mut bars: Vec<DailyBar> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let open = *quote.open.get(i)?;
            let high = *quote.high.get(i)?;
            let low = *quote.low.get(i)?;
            let close = *quote.close.get(i)?;
            let volume = *quote.volume.get(i)?;
            let bar = DailyBar {
                ts,
                open: open?,
                high: high?,
                low: low?,
                close: close?,
                volume: volume?,
            };
            let consistent = bar.low <= bar.open
                && bar.low <= bar.close
                && bar.open <= bar.high
                && bar.close <= bar.high;
            consistent.then_some(bar)
        })
        .collect();

    bars.sort_by_key(|b| b.ts);
    bars.dedup_by_key(|b| b.ts);
    bars
}

async fn fetch_chart(client: &reqwest::Client, url: &str) -> Result<ChartResult, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let envelope: ChartEnvelope = response.json().await.map_err(|e| e.to_string())?;
    envelope
        .chart
        .result
        .and_then(|mut r| (!r.is_empty()).then(|| r.remove(0)))
        .ok_or_else(|| "No chart data in response".to_string())
}

impl App {
    /// Fetch one year of daily bars for the selected symbol. Cached bars
    /// render immediately while the refresh runs.
    pub fn fetch_history(&mut self, ctx: &egui::Context) {
        let Some(code) = self.selected_code() else {
            return;
        };

        let cached = self.db.get_bars(&code).unwrap_or_default();
        {
            let mut slot = self.history.lock().unwrap();
            slot.symbol = code.clone();
            slot.status = FetchStatus::Loading;
            slot.bars = cached;
            slot.warning = None;
        }

        let slot = self.history.clone();
        let client = self.http.clone();
        let db_path = self.db_path.clone();
        let ctx = ctx.clone();
        let url = chart_url(&code, "1y", "1d");

        debug!(symbol = %code, "Fetching daily history");
        self.runtime.spawn(async move {
            let result = fetch_chart(&client, &url).await.map(|r| flatten_chart(&r));

            match result {
                Ok(bars) if !bars.is_empty() => {
                    let count = bars.len();
                    // Own connection: SQLite handles are not sent across tasks
                    match Database::open(&db_path) {
                        Ok(mut db) => {
                            if let Err(e) = db.replace_bars(&code, &bars) {
                                warn!(symbol = %code, error = %e, "Failed to cache bars");
                            }
                        }
                        Err(e) => warn!(error = %e, "Failed to open database for bar cache"),
                    }

                    let mut s = slot.lock().unwrap();
                    if s.symbol == code {
                        s.bars = bars;
                        s.status = FetchStatus::Ready;
                        s.warning = None;
                    }
                    info!(symbol = %code, bars = count, "History cached");
                    ctx.memory_mut(|mem| {
                        mem.data.insert_temp("bars_cached".into(), code.clone())
                    });
                }
                Ok(_) => {
                    let mut s = slot.lock().unwrap();
                    if s.symbol == code {
                        fail_slot(&mut s, "Chart response contained no bars".to_string());
                    }
                }
                Err(e) => {
                    warn!(symbol = %code, error = %e, "History fetch failed");
                    let mut s = slot.lock().unwrap();
                    if s.symbol == code {
                        fail_slot(&mut s, e);
                    }
                }
            }
            ctx.request_repaint();
        });
    }

    /// Fetch the company profile and score its business summary
    pub fn fetch_profile(&mut self, ctx: &egui::Context) {
        let Some(code) = self.selected_code() else {
            return;
        };

        let cached = self.db.get_profile(&code).ok().flatten();
        {
            let mut slot = self.profile.lock().unwrap();
            slot.symbol = code.clone();
            slot.status = FetchStatus::Loading;
            slot.polarity = cached
                .as_ref()
                .and_then(|p| p.summary.as_deref())
                .map(sentiment::polarity);
            slot.profile = cached;
        }

        let slot = self.profile.clone();
        let client = self.http.clone();
        let db_path = self.db_path.clone();
        let ctx = ctx.clone();
        let url = profile_url(&code);

        debug!(symbol = %code, "Fetching company profile");
        self.runtime.spawn(async move {
            let result: Result<CompanyProfile, String> = async {
                let response = client.get(&url).send().await.map_err(|e| e.to_string())?;
                if !response.status().is_success() {
                    return Err(format!("HTTP {}", response.status()));
                }
                let envelope: QuoteSummaryEnvelope =
                    response.json().await.map_err(|e| e.to_string())?;
                let asset = envelope
                    .quote_summary
                    .result
                    .and_then(|mut r| (!r.is_empty()).then(|| r.remove(0)))
                    .and_then(|r| r.asset_profile)
                    .ok_or_else(|| "No profile in response".to_string())?;
                Ok(CompanyProfile {
                    symbol: code.clone(),
                    summary: asset.long_business_summary,
                    sector: asset.sector,
                    industry: asset.industry,
                    website: asset.website,
                    fetched_at: Utc::now().timestamp(),
                })
            }
            .await;

            match result {
                Ok(profile) => {
                    match Database::open(&db_path) {
                        Ok(db) => {
                            if let Err(e) = db.upsert_profile(&profile) {
                                warn!(symbol = %profile.symbol, error = %e, "Failed to cache profile");
                            }
                        }
                        Err(e) => warn!(error = %e, "Failed to open database for profile cache"),
                    }
                    let polarity = profile.summary.as_deref().map(sentiment::polarity);
                    debug!(symbol = %profile.symbol, polarity = ?polarity, "Profile scored");

                    let mut s = slot.lock().unwrap();
                    if s.symbol == profile.symbol {
                        s.polarity = polarity;
                        s.profile = Some(profile);
                        s.status = FetchStatus::Ready;
                    }
                }
                Err(e) => {
                    warn!(symbol = %code, error = %e, "Profile fetch failed");
                    let mut s = slot.lock().unwrap();
                    if s.symbol == code {
                        s.status = FetchStatus::Failed(e);
                    }
                }
            }
            ctx.request_repaint();
        });
    }

    /// Warm the bar cache for every starred symbol behind a semaphore
    pub fn prefetch_watchlist(&mut self, ctx: &egui::Context) {
        if self.prefetch_running {
            return;
        }
        let codes: Vec<String> = self
            .symbols
            .iter()
            .filter(|s| s.watchlisted)
            .map(|s| s.code.clone())
            .collect();
        if codes.is_empty() {
            return;
        }
        self.prefetch_running = true;

        let client = self.http.clone();
        let db_path = self.db_path.clone();
        let ctx = ctx.clone();

        info!(count = codes.len(), "Starting watchlist prefetch");
        self.runtime.spawn(async move {
            let semaphore = Arc::new(tokio::sync::Semaphore::new(PREFETCH_PARALLELISM));
            let ok = Arc::new(Mutex::new(0usize));
            let mut handles = vec![];

            for code in codes {
                let sem = semaphore.clone();
                let client = client.clone();
                let db_path = db_path.clone();
                let ok = ok.clone();
                let url = chart_url(&code, "1y", "1d");

                handles.push(tokio::spawn(async move {
                    let _permit = sem.acquire().await.ok();
                    match fetch_chart(&client, &url).await.map(|r| flatten_chart(&r)) {
                        Ok(bars) if !bars.is_empty() => {
                            if let Ok(mut db) = Database::open(&db_path) {
                                if db.replace_bars(&code, &bars).is_ok() {
                                    *ok.lock().unwrap() += 1;
                                }
                            }
                        }
                        Ok(_) => {}
                        Err(e) => debug!(symbol = %code, error = %e, "Prefetch fetch failed"),
                    }
                }));
            }

            for handle in handles {
                let _ = handle.await;
            }

            let warmed = *ok.lock().unwrap();
            info!(warmed = warmed, "Watchlist prefetch complete");
            ctx.memory_mut(|mem| {
                mem.data
                    .insert_temp("prefetch_done".into(), warmed.to_string())
            });
            ctx.request_repaint();
        });
    }
}

fn fail_slot(slot: &mut HistorySlot, message: String) {
    if slot.bars.is_empty() {
        slot.status = FetchStatus::Failed(message);
    } else {
        // Keep showing cached bars with a warning line
        slot.status = FetchStatus::Ready;
        slot.warning = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "TCS.NS",
                    "currency": "INR",
                    "regularMarketPrice": 3512.4,
                    "chartPreviousClose": 3498.1
                },
                "timestamp": [1700011800, 1700098200, 1700184600, 1700271000],
                "indicators": {
                    "quote": [{
                        "open":   [3400.0, 3420.0, null,   3500.0],
                        "high":   [3450.0, 3460.0, 3470.0, 3480.0],
                        "low":    [3390.0, 3400.0, 3410.0, 3520.0],
                        "close":  [3420.0, 3450.0, 3430.0, 3470.0],
                        "volume": [1200000, 1500000, 900000, 1100000]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn chart_fixture_parses_and_flattens() {
        let envelope: ChartEnvelope = serde_json::from_str(CHART_FIXTURE).unwrap();
        let result = &envelope.chart.result.as_ref().unwrap()[0];
        assert_eq!(result.meta.regular_market_price, Some(3512.4));

        let bars = flatten_chart(result);
        // Index 2 has a null open; index 3 has low > close
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].ts, 1700011800);
        assert_eq!(bars[0].close, 3420.0);
        assert!(bars.windows(2).all(|w| w[0].ts < w[1].ts));
    }

    #[test]
    fn empty_quote_block_yields_no_bars() {
        let json = r#"{
            "chart": {"result": [{"meta": {}, "timestamp": [], "indicators": {"quote": []}}]}
        }"#;
        let envelope: ChartEnvelope = serde_json::from_str(json).unwrap();
        let result = &envelope.chart.result.as_ref().unwrap()[0];
        assert!(flatten_chart(result).is_empty());
    }

    #[test]
    fn quote_summary_fixture_parses() {
        let json = r#"{
            "quoteSummary": {
                "result": [{
                    "assetProfile": {
                        "longBusinessSummary": "A leading IT services company.",
                        "sector": "Technology",
                        "industry": "Information Technology Services",
                        "website": "https://www.tcs.com"
                    }
                }]
            }
        }"#;
        let envelope: QuoteSummaryEnvelope = serde_json::from_str(json).unwrap();
        let asset = envelope.quote_summary.result.unwrap()[0]
            .asset_profile
            .as_ref()
            .unwrap()
            .long_business_summary
            .clone();
        assert_eq!(asset.as_deref(), Some("A leading IT services company."));
    }

    #[test]
    fn urls_encode_symbols() {
        assert_eq!(
            chart_url("M&M.NS", "1y", "1d"),
            format!("{}/v8/finance/chart/M%26M.NS?range=1y&interval=1d", QUOTE_HOST)
        );
        assert!(profile_url("TCS.NS").contains("/v10/finance/quoteSummary/TCS.NS"));
    }
}
