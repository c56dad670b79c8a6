//! Bar, the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// End-of-day OHLCV observation for one instrument on one calendar date.
///
/// Every numeric field is optional because the upstream bar source may hand
/// over partially populated rows. Nothing downstream of [`Bar::validate`]
/// looks at the raw optionals for OHLCV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub instrument_id: String,
    pub trade_date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    /// Dividend/split-adjusted close, when the source has one.
    #[serde(default)]
    pub adj_close: Option<f64>,
    /// Corporate-action event code attached by the source (split, dividend, ...).
    #[serde(default)]
    pub ca_event: Option<String>,
    /// Heuristic corporate-action hint (e.g. an unexplained overnight gap).
    #[serde(default)]
    pub ca_hint: Option<String>,
}

/// Why a bar failed the data-quality guard.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("non-positive {field}: {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("high {high} below low {low}")]
    HighBelowLow { high: f64, low: f64 },
    #[error("negative volume: {0}")]
    NegativeVolume(f64),
    #[error("non-finite volume: {0}")]
    NonFiniteVolume(f64),
}

/// A bar that passed the data-quality guard. OHLC are finite and positive,
/// `high >= low`, and volume is finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Create a fully populated bar with no adjusted close and no corporate-action hints.
    pub fn new(
        instrument_id: impl Into<String>,
        trade_date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            trade_date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
            adj_close: None,
            ca_event: None,
            ca_hint: None,
        }
    }

    pub fn with_adj_close(mut self, adj_close: f64) -> Self {
        self.adj_close = Some(adj_close);
        self
    }

    pub fn with_ca_event(mut self, code: impl Into<String>) -> Self {
        self.ca_event = Some(code.into());
        self
    }

    pub fn with_ca_hint(mut self, code: impl Into<String>) -> Self {
        self.ca_hint = Some(code.into());
        self
    }

    /// Data-quality guard. Checks run in a fixed order so the reported
    /// reason is stable for a given row.
    pub fn validate(&self) -> Result<ValidBar, BarError> {
        let open = positive("open", self.open)?;
        let high = positive("high", self.high)?;
        let low = positive("low", self.low)?;
        let close = positive("close", self.close)?;
        if high < low {
            return Err(BarError::HighBelowLow { high, low });
        }
        let volume = match self.volume {
            None => return Err(BarError::Missing("volume")),
            Some(v) if v.is_nan() => return Err(BarError::Missing("volume")),
            Some(v) if v < 0.0 => return Err(BarError::NegativeVolume(v)),
            Some(v) if v.is_infinite() => return Err(BarError::NonFiniteVolume(v)),
            Some(v) => v,
        };
        Ok(ValidBar {
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Non-empty event code, if any.
    pub fn corporate_action_event(&self) -> Option<&str> {
        non_blank(self.ca_event.as_deref())
    }

    /// Non-empty heuristic hint, if any.
    pub fn corporate_action_hint(&self) -> Option<&str> {
        non_blank(self.ca_hint.as_deref())
    }

    /// True if the source flagged a corporate action on this bar.
    pub fn has_corporate_action(&self) -> bool {
        self.corporate_action_event().is_some() || self.corporate_action_hint().is_some()
    }
}

fn positive(field: &'static str, value: Option<f64>) -> Result<f64, BarError> {
    match value {
        None => Err(BarError::Missing(field)),
        Some(v) if v.is_nan() => Err(BarError::Missing(field)),
        Some(v) if v <= 0.0 || !v.is_finite() => Err(BarError::NonPositive { field, value: v }),
        Some(v) => Ok(v),
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
