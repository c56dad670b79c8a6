#![allow(dead_code)]

use chrono::NaiveDate;
use eodsignal_core::domain::{Bar, PriceBasis};
use eodsignal_core::engine::{
    CorporateActionEvent, GuardObserver, InsufficientWindowEvent, InvalidBarEvent, WindowCounts,
};

pub fn day(i: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + chrono::Duration::days(i)
}

/// 260 bars of zig-zag uptrend ending in a breakout on the last bar.
///
/// Bars 0..=258 close at `44.4 + 0.2 i ± 3` (plus on even i), high/low one
/// point either side, volume 1000. Bar 258 closes at 99, so the prior 20-day
/// resistance is 100. Bar 259 opens at 100 and closes at 110 on 1800 shares.
pub fn breakout_series(id: &str) -> Vec<Bar> {
    let mut bars: Vec<Bar> = (0..259)
        .map(|i| {
            let base = 44.4 + 0.2 * i as f64;
            let close = if i % 2 == 0 { base + 3.0 } else { base - 3.0 };
            Bar::new(id, day(i), base, close + 1.0, close - 1.0, close, 1000.0)
        })
        .collect();
    bars.push(Bar::new(id, day(259), 100.0, 110.5, 99.5, 110.0, 1800.0));
    bars
}

pub fn target_of(bars: &[Bar]) -> NaiveDate {
    bars.last().unwrap().trade_date
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidCall {
    pub instrument_id: String,
    pub trade_date: NaiveDate,
    pub close: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowCall {
    pub instrument_id: String,
    pub missing: Vec<&'static str>,
    pub counts: WindowCounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionCall {
    pub instrument_id: String,
    pub event_code: Option<String>,
    pub hint_code: Option<String>,
    pub candidate_basis: PriceBasis,
    pub candidate_price: f64,
}

/// Observer that records every callback it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    pub invalid: Vec<InvalidCall>,
    pub windows: Vec<WindowCall>,
    pub actions: Vec<ActionCall>,
}

impl GuardObserver for Recorder {
    fn on_invalid_bar(&mut self, e: &InvalidBarEvent<'_>) {
        self.invalid.push(InvalidCall {
            instrument_id: e.instrument_id.to_string(),
            trade_date: e.trade_date,
            close: e.close,
        });
    }

    fn on_insufficient_window(&mut self, e: &InsufficientWindowEvent<'_>) {
        self.windows.push(WindowCall {
            instrument_id: e.instrument_id.to_string(),
            missing: e.missing.to_vec(),
            counts: e.counts,
        });
    }

    fn on_corporate_action(&mut self, e: &CorporateActionEvent<'_>) {
        self.actions.push(ActionCall {
            instrument_id: e.instrument_id.to_string(),
            event_code: e.event_code.map(str::to_string),
            hint_code: e.hint_code.map(str::to_string),
            candidate_basis: e.candidate_basis,
            candidate_price: e.candidate_price,
        });
    }
}
