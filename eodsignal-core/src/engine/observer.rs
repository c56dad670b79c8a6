//! Guard observer: synchronous hooks for the three recoverable data problems.
//!
//! Hooks run on the pass's critical path. An observer that does I/O owns its
//! own timeout and retry policy.

use crate::domain::{BarError, PriceBasis};
use crate::engine::state::WindowCounts;
use chrono::NaiveDate;

/// A target-date bar failed the data-quality guard and produced no record.
#[derive(Debug, Clone)]
pub struct InvalidBarEvent<'a> {
    pub trade_date: NaiveDate,
    pub instrument_id: &'a str,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<f64>,
    pub reason: &'a BarError,
}

/// A record was emitted with one or more window-derived fields absent.
#[derive(Debug, Clone)]
pub struct InsufficientWindowEvent<'a> {
    pub trade_date: NaiveDate,
    pub instrument_id: &'a str,
    pub missing: &'a [&'static str],
    pub counts: WindowCounts,
}

/// A target-date bar carried a corporate-action flag; a neutral record was
/// emitted instead of a classification.
#[derive(Debug, Clone)]
pub struct CorporateActionEvent<'a> {
    pub trade_date: NaiveDate,
    pub instrument_id: &'a str,
    pub event_code: Option<&'a str>,
    pub hint_code: Option<&'a str>,
    /// Basis and price the indicators would have used.
    pub candidate_basis: PriceBasis,
    pub candidate_price: f64,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
}

pub trait GuardObserver {
    fn on_invalid_bar(&mut self, _event: &InvalidBarEvent<'_>) {}

    fn on_insufficient_window(&mut self, _event: &InsufficientWindowEvent<'_>) {}

    fn on_corporate_action(&mut self, _event: &CorporateActionEvent<'_>) {}
}

impl<O: GuardObserver + ?Sized> GuardObserver for &mut O {
    fn on_invalid_bar(&mut self, event: &InvalidBarEvent<'_>) {
        (**self).on_invalid_bar(event)
    }

    fn on_insufficient_window(&mut self, event: &InsufficientWindowEvent<'_>) {
        (**self).on_insufficient_window(event)
    }

    fn on_corporate_action(&mut self, event: &CorporateActionEvent<'_>) {
        (**self).on_corporate_action(event)
    }
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GuardObserver for NoopObserver {}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl GuardObserver for TracingObserver {
    fn on_invalid_bar(&mut self, e: &InvalidBarEvent<'_>) {
        tracing::warn!(
            trade_date = %e.trade_date,
            instrument_id = e.instrument_id,
            open = ?e.open,
            high = ?e.high,
            low = ?e.low,
            close = ?e.close,
            adj_close = ?e.adj_close,
            volume = ?e.volume,
            reason = %e.reason,
            "invalid bar on target date, skipped"
        );
    }

    fn on_insufficient_window(&mut self, e: &InsufficientWindowEvent<'_>) {
        tracing::warn!(
            trade_date = %e.trade_date,
            instrument_id = e.instrument_id,
            missing = ?e.missing,
            counts = ?e.counts,
            "insufficient history for indicator windows"
        );
    }

    fn on_corporate_action(&mut self, e: &CorporateActionEvent<'_>) {
        tracing::warn!(
            trade_date = %e.trade_date,
            instrument_id = e.instrument_id,
            event_code = ?e.event_code,
            hint_code = ?e.hint_code,
            candidate_basis = %e.candidate_basis,
            candidate_price = e.candidate_price,
            close = ?e.close,
            adj_close = ?e.adj_close,
            "corporate action suspected, emitted neutral record; \
             rebuild history before trusting this date"
        );
    }
}
