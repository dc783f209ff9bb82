//! Live watch poll loop

use super::history::chart_url;
use super::App;
use crate::indicators::classify_move;
use crate::theme::LIVE_HISTORY_POINTS;
use crate::types::{ChartEnvelope, LiveSlot};
use chrono::Utc;
use eframe::egui;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

impl App {
    /// Start (or restart) polling the selected symbol's live quote. Each
    /// successful poll pushes an up/flat/down move into the trend buffer.
    pub fn start_live(&mut self, ctx: &egui::Context) {
        let Some(code) = self.selected_code() else {
            return;
        };
        self.stop_live();

        {
            let mut slot = self.live.lock().unwrap();
            slot.symbol = code.clone();
            slot.running = true;
            slot.last_price = None;
            slot.prev_close = None;
            slot.error = None;
            slot.trend.clear();
            slot.last_move = None;
            slot.prices.clear();
            slot.polls = 0;
            slot.last_poll = None;
        }

        let token = CancellationToken::new();
        self.live_token = Some(token.clone());

        let slot = self.live.clone();
        let client = self.http.clone();
        let ctx = ctx.clone();
        let poll_secs = self.poll_secs;
        let url = chart_url(&code, "1d", "1m");

        info!(symbol = %code, interval = poll_secs, "Live watch started");
        self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(poll_secs));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(symbol = %code, "Live watch cancelled");
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                let result = poll_quote(&client, &url).await;
                if let Err(e) = &result {
                    warn!(symbol = %code, error = %e, "Live poll failed");
                }

                let mut s = slot.lock().unwrap();
                if !s.running || s.symbol != code {
                    break;
                }
                apply_poll(&mut s, result);
                drop(s);
                ctx.request_repaint();
            }
        });
    }

    pub fn stop_live(&mut self) {
        if let Some(token) = self.live_token.take() {
            token.cancel();
        }
        let mut slot = self.live.lock().unwrap();
        if slot.running {
            info!(symbol = %slot.symbol, polls = slot.polls, "Live watch stopped");
        }
        slot.running = false;
    }
}

/// Fold one poll outcome into the slot. A failed poll records the error,
/// which the view shows in place of the price, and leaves the trend
/// buffer as it stands until polling recovers.
fn apply_poll(s: &mut LiveSlot, result: Result<(f64, Option<f64>), String>) {
    s.polls += 1;
    s.last_poll = Some(Utc::now());
    match result {
        Ok((price, prev_close)) => {
            // Trend compares consecutive polls, not the day open
            if let Some(prev) = s.last_price {
                let mv = classify_move(prev, price);
                s.trend.push(mv);
                s.last_move = Some(mv);
            }
            s.last_price = Some(price);
            if s.prev_close.is_none() {
                s.prev_close = prev_close;
            }
            s.prices.push(price);
            if s.prices.len() > LIVE_HISTORY_POINTS {
                let excess = s.prices.len() - LIVE_HISTORY_POINTS;
                s.prices.drain(..excess);
            }
            s.error = None;
        }
        Err(e) => {
            s.error = Some(e);
        }
    }
}

async fn poll_quote(client: &reqwest::Client, url: &str) -> Result<(f64, Option<f64>), String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let envelope: ChartEnvelope = response.json().await.map_err(|e| e.to_string())?;
    let meta = envelope
        .chart
        .result
        .and_then(|mut r| (!r.is_empty()).then(|| r.remove(0)))
        .map(|r| r.meta)
        .ok_or_else(|| "No quote data in response".to_string())?;
    let price = meta
        .regular_market_price
        .ok_or_else(|| "Quote carried no market price".to_string())?;
    Ok((price, meta.chart_previous_close))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::Signal;

    #[test]
    fn successful_polls_build_the_trend() {
        let mut slot = LiveSlot::default();
        apply_poll(&mut slot, Ok((100.0, Some(99.0))));
        // The first poll has nothing to compare against
        assert!(slot.trend.is_empty());
        assert_eq!(slot.last_price, Some(100.0));
        assert_eq!(slot.prev_close, Some(99.0));

        apply_poll(&mut slot, Ok((101.0, Some(99.0))));
        apply_poll(&mut slot, Ok((102.0, Some(99.0))));
        apply_poll(&mut slot, Ok((103.0, Some(99.0))));
        assert_eq!(slot.trend.signal(), Signal::Buy);
        assert_eq!(slot.polls, 4);
        assert_eq!(slot.prices.len(), 4);
    }

    #[test]
    fn failed_poll_reports_error_until_recovery() {
        let mut slot = LiveSlot::default();
        apply_poll(&mut slot, Ok((100.0, None)));
        apply_poll(&mut slot, Ok((101.0, None)));
        let trend_before = slot.trend.len();

        apply_poll(&mut slot, Err("HTTP 429".to_string()));
        assert_eq!(slot.error.as_deref(), Some("HTTP 429"));
        // Stale price and trend stay in the slot while the error shows
        assert_eq!(slot.last_price, Some(101.0));
        assert_eq!(slot.trend.len(), trend_before);

        apply_poll(&mut slot, Ok((102.0, None)));
        assert!(slot.error.is_none());
        assert_eq!(slot.last_price, Some(102.0));
    }

    #[test]
    fn price_history_is_bounded() {
        let mut slot = LiveSlot::default();
        for i in 0..(LIVE_HISTORY_POINTS + 25) {
            apply_poll(&mut slot, Ok((100.0 + i as f64, None)));
        }
        assert_eq!(slot.prices.len(), LIVE_HISTORY_POINTS);
        assert_eq!(slot.prices[0], 100.0 + 25.0);
    }
}
