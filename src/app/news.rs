//! Finance headline feed fetch

use super::App;
use crate::constants::{NEWS_FEED_URL, USER_AGENT};
use crate::feed;
use crate::types::FetchStatus;
use eframe::egui;
use std::time::Duration;
use tracing::{debug, info, warn};

impl App {
    /// Refresh the headline feed on a plain thread. The blocking client is
    /// fine here because the feed is fetched rarely and never in bulk.
    pub fn fetch_news(&mut self, ctx: &egui::Context, announce: bool) {
        {
            let mut slot = self.news.lock().unwrap();
            if slot.status == FetchStatus::Loading {
                return;
            }
            slot.status = FetchStatus::Loading;
        }

        let slot = self.news.clone();
        let ctx = ctx.clone();

        debug!("Fetching headline feed");
        std::thread::spawn(move || {
            let result = (|| -> Result<Vec<crate::types::Headline>, String> {
                let client = reqwest::blocking::Client::builder()
                    .user_agent(USER_AGENT)
                    .timeout(Duration::from_secs(20))
                    .build()
                    .map_err(|e| e.to_string())?;
                let response = client
                    .get(NEWS_FEED_URL)
                    .send()
                    .map_err(|e| e.to_string())?;
                if !response.status().is_success() {
                    return Err(format!("HTTP {}", response.status()));
                }
                let body = response.bytes().map_err(|e| e.to_string())?;
                feed::parse_headlines(&body).map_err(|e| e.to_string())
            })();

            match &result {
                Ok(headlines) => {
                    info!(count = headlines.len(), "Headlines refreshed");
                    if announce {
                        ctx.memory_mut(|mem| {
                            mem.data.insert_temp(
                                "news_refreshed".into(),
                                headlines.len().to_string(),
                            )
                        });
                    }
                }
                Err(e) => warn!(error = %e, "Headline fetch failed"),
            }
            apply_fetch_result(&mut slot.lock().unwrap(), result);
            ctx.request_repaint();
        });
    }
}

/// Fold a fetch outcome into the slot. A failed refresh keeps stale
/// headlines on screen but carries the error as a warning line.
fn apply_fetch_result(
    slot: &mut crate::types::NewsSlot,
    result: Result<Vec<crate::types::Headline>, String>,
) {
    match result {
        Ok(headlines) => {
            slot.headlines = headlines;
            slot.status = FetchStatus::Ready;
            slot.warning = None;
        }
        Err(e) => {
            if slot.headlines.is_empty() {
                slot.status = FetchStatus::Failed(e);
            } else {
                slot.status = FetchStatus::Ready;
                slot.warning = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Headline, NewsSlot};

    fn headline(title: &str) -> Headline {
        Headline {
            title: title.to_string(),
            link: "https://example.com".to_string(),
            source: None,
            published: None,
        }
    }

    #[test]
    fn failed_refresh_keeps_stale_headlines_with_warning() {
        let mut slot = NewsSlot {
            status: FetchStatus::Loading,
            headlines: vec![headline("old")],
            warning: None,
        };
        apply_fetch_result(&mut slot, Err("HTTP 503".to_string()));
        assert_eq!(slot.status, FetchStatus::Ready);
        assert_eq!(slot.headlines.len(), 1);
        assert_eq!(slot.warning.as_deref(), Some("HTTP 503"));
    }

    #[test]
    fn failed_refresh_with_nothing_cached_fails() {
        let mut slot = NewsSlot::default();
        apply_fetch_result(&mut slot, Err("HTTP 503".to_string()));
        assert_eq!(slot.status, FetchStatus::Failed("HTTP 503".to_string()));
        assert!(slot.warning.is_none());
    }

    #[test]
    fn successful_refresh_clears_warning() {
        let mut slot = NewsSlot {
            status: FetchStatus::Loading,
            headlines: vec![headline("old")],
            warning: Some("HTTP 503".to_string()),
        };
        apply_fetch_result(&mut slot, Ok(vec![headline("fresh")]));
        assert_eq!(slot.status, FetchStatus::Ready);
        assert_eq!(slot.headlines[0].title, "fresh");
        assert!(slot.warning.is_none());
    }
}
