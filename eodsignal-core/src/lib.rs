//! EOD Signal Core — rolling indicators, classifiers, streaming calculator.
//!
//! This crate turns an ordered end-of-day bar history into one classified
//! record per instrument for a target date:
//! - Domain types (bars, signal codes, output records)
//! - Streaming SMA, Wilder RSI and Wilder ATR primitives
//! - Price-basis policy (adjusted vs raw close)
//! - Pattern, decision and volume-label classifiers
//! - Signal continuity (pattern age)
//! - Streaming per-instrument calculator with data-quality and
//!   corporate-action guards
//! - Trade-date/cutoff gate over a trading calendar
//!
//! The crate does no I/O of its own: bars come in through an iterator and
//! records go out to whatever [`sink::RecordSink`] the caller provides.

pub mod basis;
pub mod calendar;
pub mod classify;
pub mod config;
pub mod continuity;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
pub mod sink;

pub use config::{ConfigError, SignalConfig};
pub use domain::{Bar, DecisionCode, IndicatorRecord, PatternCode, PrevSnapshot, VolumeLabel};
pub use engine::{PassOutput, PassStats, SignalCalculator};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across chunk threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::IndicatorRecord>();
        require_sync::<domain::IndicatorRecord>();
        require_send::<domain::PrevSnapshot>();
        require_sync::<domain::PrevSnapshot>();

        require_send::<SignalConfig>();
        require_sync::<SignalConfig>();
        require_send::<SignalCalculator>();
        require_sync::<SignalCalculator>();
        require_send::<PassOutput>();
        require_send::<engine::RollingState>();

        require_send::<calendar::WeekdayCalendar>();
        require_sync::<calendar::WeekdayCalendar>();
    }

    /// Classifiers are pure functions of their inputs: no `&mut`, no state.
    #[test]
    fn classifiers_are_pure_functions() {
        fn _check(
            f: &classify::FeatureBundle,
            config: &SignalConfig,
        ) -> classify::Classification {
            classify::classify(f, config)
        }
        let f = classify::FeatureBundle {
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.5,
            volume: 100.0,
            ..Default::default()
        };
        let config = SignalConfig::default();
        assert_eq!(_check(&f, &config), _check(&f, &config));
    }
}
