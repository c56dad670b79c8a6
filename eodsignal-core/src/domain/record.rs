//! Output record and the previous-day snapshot fed back into the next run.

use crate::domain::{DecisionCode, PatternCode, VolumeLabel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which price series fed the indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    Close,
    Adjusted,
}

impl fmt::Display for PriceBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceBasis::Close => write!(f, "close"),
            PriceBasis::Adjusted => write!(f, "adjusted"),
        }
    }
}

/// One computed row per (instrument, trade date).
///
/// Indicator fields are `None` when the underlying window had insufficient
/// history, or for the neutral record emitted on a corporate-action day.
/// Values are rounded once, at emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub instrument_id: String,
    pub trade_date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub price_basis: PriceBasis,
    pub price_used: f64,
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub rsi14: Option<f64>,
    pub atr14: Option<f64>,
    pub support_20d: Option<f64>,
    pub resistance_20d: Option<f64>,
    pub volume_avg_20d: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub decision: DecisionCode,
    pub pattern: PatternCode,
    pub volume_label: VolumeLabel,
    pub signal_first_seen: NaiveDate,
    pub signal_age_days: i64,
}

impl IndicatorRecord {
    /// Sink key. Re-running a date replaces the row with the same key.
    pub fn key(&self) -> (String, NaiveDate) {
        (self.instrument_id.clone(), self.trade_date)
    }
}

/// Yesterday's stored pattern for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevSnapshot {
    pub pattern: PatternCode,
    pub first_seen: Option<NaiveDate>,
}

impl From<&IndicatorRecord> for PrevSnapshot {
    fn from(record: &IndicatorRecord) -> Self {
        Self {
            pattern: record.pattern,
            first_seen: Some(record.signal_first_seen),
        }
    }
}
