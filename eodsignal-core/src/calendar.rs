//! Trading calendar and the trade-date/cutoff gate.
//!
//! The resolver decides which date a run should compute. An explicitly
//! requested date is never shifted; reporting that it is not a session is
//! the caller's job (see [`TradeDateResolver::gate`]).

use crate::config::{CutoffConfig, WindowConfig};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use std::collections::BTreeSet;
use thiserror::Error;

/// Longest run of consecutive non-session days tolerated while stepping back.
const MAX_STEP_BACK_DAYS: i64 = 31;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid trade date {input:?}: expected YYYY-MM-DD")]
    InvalidDate { input: String },
    #[error("no trading day found stepping back from {from}")]
    NoTradingDay { from: NaiveDate },
}

pub trait TradingCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool;
}

/// Monday–Friday minus an explicit holiday list.
#[derive(Debug, Clone, Default)]
pub struct WeekdayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl WeekdayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holidays(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }
}

impl TradingCalendar for WeekdayCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }
}

/// Explicit set of session dates, e.g. the distinct dates present in a bar
/// history. An empty calendar has no trading days at all.
#[derive(Debug, Clone, Default)]
pub struct SessionCalendar {
    sessions: BTreeSet<NaiveDate>,
}

impl SessionCalendar {
    pub fn new(sessions: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            sessions: sessions.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl TradingCalendar for SessionCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        self.sessions.contains(&date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotTradingDay,
}

/// What the orchestration layer should do for a resolved date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunGate {
    Compute(NaiveDate),
    Skip { date: NaiveDate, reason: SkipReason },
}

#[derive(Debug, Clone)]
pub struct TradeDateResolver<C> {
    cutoff: CutoffConfig,
    calendar: C,
}

impl<C: TradingCalendar> TradeDateResolver<C> {
    pub fn new(cutoff: CutoffConfig, calendar: C) -> Self {
        Self { cutoff, calendar }
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// True while today's bars are not yet final.
    pub fn is_before_cutoff(&self, now: NaiveDateTime) -> bool {
        (now.hour(), now.minute()) < (self.cutoff.hour, self.cutoff.minute)
    }

    /// Requested date unchanged, or the latest session whose bars are final
    /// as of `now` (local time).
    pub fn resolve(
        &self,
        requested: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<NaiveDate, ResolveError> {
        if let Some(input) = requested {
            return parse_date(input);
        }
        let today = now.date();
        let candidate = if self.is_before_cutoff(now) {
            self.previous_trading_day(today)?
        } else {
            today
        };
        self.latest_trading_day_on_or_before(candidate)
    }

    /// Resolve, then decide whether the date is computable.
    pub fn gate(
        &self,
        requested: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<RunGate, ResolveError> {
        let date = self.resolve(requested, now)?;
        if self.calendar.is_trading_day(date) {
            Ok(RunGate::Compute(date))
        } else {
            tracing::info!(%date, "not a trading day, run skipped");
            Ok(RunGate::Skip {
                date,
                reason: SkipReason::NotTradingDay,
            })
        }
    }

    /// First date of the bar history needed for `target`: the configured
    /// lookback plus warmup, counted in trading days.
    pub fn window_start(
        &self,
        target: NaiveDate,
        window: &WindowConfig,
    ) -> Result<NaiveDate, ResolveError> {
        let mut date = target;
        for _ in 0..window.total_trading_days() {
            date = self.previous_trading_day(date)?;
        }
        Ok(date)
    }

    /// The trading day strictly before `date`.
    pub fn previous_trading_day(&self, date: NaiveDate) -> Result<NaiveDate, ResolveError> {
        self.latest_trading_day_on_or_before(date - Duration::days(1))
            .map_err(|_| ResolveError::NoTradingDay { from: date })
    }

    fn latest_trading_day_on_or_before(&self, date: NaiveDate) -> Result<NaiveDate, ResolveError> {
        let mut day = date;
        for _ in 0..=MAX_STEP_BACK_DAYS {
            if self.calendar.is_trading_day(day) {
                return Ok(day);
            }
            day -= Duration::days(1);
        }
        Err(ResolveError::NoTradingDay { from: date })
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, ResolveError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| ResolveError::InvalidDate {
        input: input.to_string(),
    })
}
