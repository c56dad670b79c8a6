//! Engine configuration.
//!
//! Every threshold the classifiers and the trade-date gate consult lives here
//! and is handed to constructors explicitly. Loaded from TOML; every field has
//! a default, so an empty file is a valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const SMA_SHORT: usize = 20;
pub const SMA_MEDIUM: usize = 50;
pub const SMA_LONG: usize = 200;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
/// Length of the support/resistance/volume-average buffers.
pub const RANGE_WINDOW: usize = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternThresholds {
    pub strong_volume_ratio: f64,
    pub burst_volume_ratio: f64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            strong_volume_ratio: 2.0,
            burst_volume_ratio: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionThresholds {
    /// RSI at or above this forces Caution.
    pub rsi_ceiling: f64,
    /// RSI at or above this blocks a Buy.
    pub rsi_warn: f64,
    pub buy_volume_ratio: f64,
    pub confirm_volume_ratio: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            rsi_ceiling: 70.0,
            rsi_warn: 66.0,
            buy_volume_ratio: 1.5,
            confirm_volume_ratio: 1.0,
        }
    }
}

/// Seven ascending volume-ratio cut points for labels 2..=8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeLabelThresholds(pub [f64; 7]);

impl Default for VolumeLabelThresholds {
    fn default() -> Self {
        Self([0.4, 0.7, 1.0, 1.5, 2.0, 3.0, 4.0])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub lookback_trading_days: u32,
    pub warmup_extra_days: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lookback_trading_days: 260,
            warmup_extra_days: 60,
        }
    }
}

impl WindowConfig {
    /// Trading days of history the bar source must supply before the target date.
    pub fn total_trading_days(&self) -> u32 {
        self.lookback_trading_days + self.warmup_extra_days
    }
}

/// Local wall-clock time after which today's bars are considered final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoffConfig {
    pub hour: u32,
    pub minute: u32,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self { hour: 16, minute: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub pattern: PatternThresholds,
    pub decision: DecisionThresholds,
    pub volume_labels: VolumeLabelThresholds,
    pub window: WindowConfig,
    pub cutoff: CutoffConfig,
}

impl SignalConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pattern;
        if !(p.burst_volume_ratio > 0.0) || !(p.strong_volume_ratio > 0.0) {
            return invalid("pattern volume ratios must be positive");
        }
        if p.strong_volume_ratio < p.burst_volume_ratio {
            return invalid(format!(
                "pattern.strong_volume_ratio ({}) below burst_volume_ratio ({})",
                p.strong_volume_ratio, p.burst_volume_ratio
            ));
        }

        let d = &self.decision;
        for (name, rsi) in [("rsi_ceiling", d.rsi_ceiling), ("rsi_warn", d.rsi_warn)] {
            if !(0.0..=100.0).contains(&rsi) {
                return invalid(format!("decision.{name} must be within 0..=100, got {rsi}"));
            }
        }
        if !(d.buy_volume_ratio >= 0.0) || !(d.confirm_volume_ratio >= 0.0) {
            return invalid("decision volume ratios must be non-negative");
        }

        let t = &self.volume_labels.0;
        if t.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return invalid("volume_labels must be finite and positive");
        }
        if t.windows(2).any(|w| w[0] >= w[1]) {
            return invalid(format!("volume_labels must be strictly ascending: {t:?}"));
        }

        if self.window.lookback_trading_days == 0 {
            return invalid("window.lookback_trading_days must be positive");
        }

        if self.cutoff.hour > 23 || self.cutoff.minute > 59 {
            return invalid(format!(
                "cutoff {:02}:{:02} is not a wall-clock time",
                self.cutoff.hour, self.cutoff.minute
            ));
        }
        Ok(())
    }

    /// Content hash of the full configuration.
    ///
    /// Two runs with the same fingerprint and the same bars produce the same
    /// records.
    pub fn fingerprint(&self) -> String {
        crate::fingerprint::hash_json(self)
    }
}

fn invalid(msg: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg.into()))
}
