//! Moving average and live trend bookkeeping

use crate::constants::TREND_SAMPLES;
use std::collections::VecDeque;

/// Relative delta below which two consecutive prices count as flat
const FLAT_EPSILON: f64 = 1e-6;

/// Simple moving average aligned 1:1 with the input.
///
/// Slots before `window` samples exist are `None`; from there on each slot is
/// the arithmetic mean of the trailing `window` values.
///
/// # Panics
///
/// Panics if `window` is 0.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "SMA window must be > 0");

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i + 1 < window {
            out.push(None);
        } else {
            if i >= window {
                sum -= values[i - window];
            }
            out.push(Some(sum / window as f64));
        }
    }
    out
}

/// Buy/sell/hold signal from the trend buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn label(self) -> &'static str {
        match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::Hold => "Hold",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Signal::Buy => "Recent polls are trending up. Consider buying.",
            Signal::Sell => "Recent polls are trending down. Consider selling.",
            Signal::Hold => "No clear trend in recent polls. Hold.",
        }
    }
}

/// Classify a price move against the previous poll: -1 down, 0 flat, +1 up.
///
/// Equality within a relative epsilon counts as flat; exact float comparison
/// would never fire on live quotes.
pub fn classify_move(prev: f64, current: f64) -> i8 {
    let scale = prev.abs().max(current.abs()).max(1.0);
    let delta = current - prev;
    if delta.abs() / scale < FLAT_EPSILON {
        0
    } else if delta > 0.0 {
        1
    } else {
        -1
    }
}

/// Bounded buffer of the last few move samples, summed into a signal
#[derive(Debug, Clone, Default)]
pub struct TrendWindow {
    samples: VecDeque<i8>,
}

impl TrendWindow {
    pub fn push(&mut self, sample: i8) {
        if self.samples.len() == TREND_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = i8> + '_ {
        self.samples.iter().copied()
    }

    /// Sum the buffer: positive means buy, negative sell, zero hold.
    /// Fewer than the full sample count still sums.
    pub fn signal(&self) -> Signal {
        let sum: i32 = self.samples.iter().map(|&s| s as i32).sum();
        match sum.cmp(&0) {
            std::cmp::Ordering::Greater => Signal::Buy,
            std::cmp::Ordering::Less => Signal::Sell,
            std::cmp::Ordering::Equal => Signal::Hold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_basic_calculation() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        let out = sma(&values, 3);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(20.0));
        assert_eq!(out[3], Some(30.0));
        assert_eq!(out[4], Some(40.0));
    }

    #[test]
    fn sma_window_longer_than_input() {
        let out = sma(&[10.0, 20.0], 5);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn sma_window_one_is_identity() {
        let out = sma(&[1.5, 2.5, 3.5], 1);
        assert_eq!(out, vec![Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn sma_empty_input() {
        assert!(sma(&[], 20).is_empty());
    }

    #[test]
    #[should_panic(expected = "SMA window must be > 0")]
    fn sma_zero_window_panics() {
        sma(&[1.0], 0);
    }

    #[test]
    fn move_classification() {
        assert_eq!(classify_move(100.0, 101.0), 1);
        assert_eq!(classify_move(101.0, 100.0), -1);
        assert_eq!(classify_move(100.0, 100.0), 0);
        // Sub-epsilon jitter counts as flat
        assert_eq!(classify_move(100.0, 100.000_000_01), 0);
    }

    #[test]
    fn trend_signal_sums_buffer() {
        let mut trend = TrendWindow::default();
        assert_eq!(trend.signal(), Signal::Hold);

        trend.push(1);
        assert_eq!(trend.signal(), Signal::Buy);

        trend.push(-1);
        assert_eq!(trend.signal(), Signal::Hold);

        trend.push(-1);
        assert_eq!(trend.signal(), Signal::Sell);
    }

    #[test]
    fn trend_buffer_is_bounded() {
        let mut trend = TrendWindow::default();
        for _ in 0..5 {
            trend.push(-1);
        }
        assert_eq!(trend.len(), TREND_SAMPLES);

        // Three ups must fully displace the downs
        for _ in 0..TREND_SAMPLES {
            trend.push(1);
        }
        assert_eq!(trend.signal(), Signal::Buy);
    }

    #[test]
    fn trend_clear_resets_to_hold() {
        let mut trend = TrendWindow::default();
        assert!(trend.is_empty());
        trend.push(1);
        trend.push(1);
        trend.clear();
        assert!(trend.is_empty());
        assert_eq!(trend.signal(), Signal::Hold);
    }
}
