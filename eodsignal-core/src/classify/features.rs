//! Numeric features for one instrument on the target date, and the bar-shape
//! helpers the classifiers share.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub rsi14: Option<f64>,
    pub atr14: Option<f64>,
    pub support_20d: Option<f64>,
    pub resistance_20d: Option<f64>,
    pub volume_avg_20d: Option<f64>,
    pub volume_ratio: Option<f64>,
}

/// Fraction of the day's range at or above which the close is "near the high".
pub const TOP_QUARTILE: f64 = 0.75;
/// Fraction of the day's range at or below which the close is "weak".
pub const BOTTOM_HALF: f64 = 0.5;

impl FeatureBundle {
    /// Names of window-derived fields that are absent. Empty means the
    /// history was long enough for every indicator.
    pub fn missing_window_fields(&self) -> Vec<&'static str> {
        [
            ("ma20", self.ma20),
            ("ma50", self.ma50),
            ("ma200", self.ma200),
            ("rsi14", self.rsi14),
            ("atr14", self.atr14),
            ("support_20d", self.support_20d),
            ("resistance_20d", self.resistance_20d),
            ("volume_avg_20d", self.volume_avg_20d),
            ("volume_ratio", self.volume_ratio),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Where the close sits in the day's high-low range, 0.0 at the low and
    /// 1.0 at the high. `None` for a zero-range bar.
    pub fn close_position(&self) -> Option<f64> {
        let range = self.high - self.low;
        (range > 0.0).then(|| (self.close - self.low) / range)
    }

    pub fn close_in_top_quartile(&self) -> bool {
        self.close_position().is_some_and(|p| p >= TOP_QUARTILE)
    }

    pub fn close_in_bottom_half(&self) -> bool {
        self.close_position().is_some_and(|p| p <= BOTTOM_HALF)
    }

    /// Candle body as a fraction of the close.
    pub fn body_pct(&self) -> f64 {
        if self.close > 0.0 {
            (self.close - self.open).abs() / self.close
        } else {
            0.0
        }
    }

    /// MA20 > MA50 > MA200, all present.
    pub fn bullish_stack(&self) -> bool {
        match (self.ma20, self.ma50, self.ma200) {
            (Some(m20), Some(m50), Some(m200)) => m20 > m50 && m50 > m200,
            _ => false,
        }
    }

    pub fn volume_ratio_at_least(&self, threshold: f64) -> bool {
        self.volume_ratio.is_some_and(|r| r >= threshold)
    }

    pub fn closed_above_resistance(&self) -> bool {
        self.resistance_20d.is_some_and(|r| self.close > r)
    }
}

/// |a - b| / b, or `None` when `b` is not positive.
pub(crate) fn distance_pct(a: f64, b: f64) -> Option<f64> {
    (b > 0.0).then(|| (a - b).abs() / b)
}
