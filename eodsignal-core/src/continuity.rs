//! Signal continuity: how long the current pattern code has persisted.

use crate::domain::{PatternCode, PrevSnapshot};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continuity {
    pub first_seen: NaiveDate,
    /// Calendar days since `first_seen`, never negative.
    pub age_days: i64,
}

/// Age the current pattern against yesterday's snapshot.
///
/// Carries `first_seen` forward only when the pattern is unchanged and the
/// snapshot recorded a first-seen date; every other case restarts at
/// `trade_date`. The caller is responsible for passing the right snapshot.
pub fn compute_from_prev(
    instrument_id: &str,
    trade_date: NaiveDate,
    current: PatternCode,
    prev: Option<&PrevSnapshot>,
) -> Continuity {
    let restart = Continuity {
        first_seen: trade_date,
        age_days: 0,
    };
    let Some(prev) = prev else {
        return restart;
    };
    match prev.first_seen {
        Some(first_seen) if prev.pattern == current => Continuity {
            first_seen,
            age_days: (trade_date - first_seen).num_days().max(0),
        },
        _ => {
            tracing::trace!(
                instrument_id,
                from = prev.pattern.code(),
                to = current.code(),
                "signal continuity restarted"
            );
            restart
        }
    }
}
