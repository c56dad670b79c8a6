//! Streaming per-instrument calculator.
//!
//! Consumes bars grouped by instrument and ascending by date, keeps one
//! [`RollingState`] for the instrument currently being read, and yields at
//! most one [`IndicatorRecord`] per instrument for the target date.
//!
//! Per bar, in this order:
//! 1. reset state if the instrument changed
//! 2. snapshot support/resistance/average volume (excludes this bar)
//! 3. data-quality guard; rejected bars never touch the state
//! 4. push the indicator price (adjusted when available) and the real H/L/C
//! 5. append to the range buffers
//! 6. stop here unless the bar is on the target date
//! 7. corporate-action guard → neutral record
//! 8. classify, then gate the decision on window sufficiency
//! 9. age the pattern against the caller's previous snapshot
//! 10. round once and emit
//!
//! Bars must arrive in ascending date order per instrument. Out-of-order
//! input corrupts the Wilder recurrences and is not detected.

use crate::basis::{pick_for_indicators, pick_for_trading, PricePick};
use crate::classify::{classify, FeatureBundle};
use crate::config::SignalConfig;
use crate::continuity::compute_from_prev;
use crate::domain::{
    Bar, DecisionCode, IndicatorRecord, PatternCode, PrevSnapshot, ValidBar, VolumeLabel,
};
use crate::engine::observer::{
    CorporateActionEvent, GuardObserver, InsufficientWindowEvent, InvalidBarEvent,
};
use crate::engine::state::{RangeSnapshot, RollingState};
use chrono::NaiveDate;
use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};

/// Previous-day snapshots keyed by instrument id.
pub type PrevSnapshots = HashMap<String, PrevSnapshot>;

/// Counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    pub bars_seen: usize,
    pub instruments_seen: usize,
    pub emitted: usize,
    /// Target-date bars dropped by the data-quality guard.
    pub skipped_invalid: usize,
    /// Instruments with at least one invalid target-date bar.
    pub invalid_instruments: BTreeSet<String>,
    pub corporate_actions: usize,
    pub insufficient_windows: usize,
    /// Repeated target-date bars for an instrument that already emitted.
    pub duplicates: usize,
}

impl PassStats {
    pub fn merge(&mut self, other: PassStats) {
        self.bars_seen += other.bars_seen;
        self.instruments_seen += other.instruments_seen;
        self.emitted += other.emitted;
        self.skipped_invalid += other.skipped_invalid;
        self.invalid_instruments.extend(other.invalid_instruments);
        self.corporate_actions += other.corporate_actions;
        self.insufficient_windows += other.insufficient_windows;
        self.duplicates += other.duplicates;
    }
}

/// Records and counters from a completed pass.
#[derive(Debug, Clone, Default)]
pub struct PassOutput {
    pub records: Vec<IndicatorRecord>,
    pub stats: PassStats,
}

#[derive(Debug, Clone)]
pub struct SignalCalculator {
    config: SignalConfig,
    target_date: NaiveDate,
}

impl SignalCalculator {
    pub fn new(config: SignalConfig, target_date: NaiveDate) -> Self {
        Self {
            config,
            target_date,
        }
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Lazily compute records. Each bar is read once; the stream cannot be
    /// restarted.
    pub fn stream<'a, I, O>(
        &'a self,
        bars: I,
        prev: &'a PrevSnapshots,
        observer: O,
    ) -> SignalStream<'a, I::IntoIter, O>
    where
        I: IntoIterator,
        I::Item: Borrow<Bar>,
        O: GuardObserver,
    {
        SignalStream {
            calc: self,
            bars: bars.into_iter(),
            prev,
            observer,
            state: RollingState::new(),
            current: None,
            emitted_current: false,
            stats: PassStats::default(),
        }
    }

    /// Run a whole pass and collect the output.
    pub fn run<I, O>(&self, bars: I, prev: &PrevSnapshots, observer: O) -> PassOutput
    where
        I: IntoIterator,
        I::Item: Borrow<Bar>,
        O: GuardObserver,
    {
        let mut stream = self.stream(bars, prev, observer);
        let records: Vec<IndicatorRecord> = stream.by_ref().collect();
        let stats = stream.into_stats();
        tracing::info!(
            target_date = %self.target_date,
            bars = stats.bars_seen,
            instruments = stats.instruments_seen,
            emitted = stats.emitted,
            skipped_invalid = stats.skipped_invalid,
            corporate_actions = stats.corporate_actions,
            insufficient_windows = stats.insufficient_windows,
            "signal pass complete"
        );
        PassOutput { records, stats }
    }
}

pub struct SignalStream<'a, I, O> {
    calc: &'a SignalCalculator,
    bars: I,
    prev: &'a PrevSnapshots,
    observer: O,
    state: RollingState,
    current: Option<String>,
    emitted_current: bool,
    stats: PassStats,
}

impl<'a, I, O> SignalStream<'a, I, O>
where
    I: Iterator,
    I::Item: Borrow<Bar>,
    O: GuardObserver,
{
    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    pub fn into_stats(self) -> PassStats {
        self.stats
    }

    fn process(&mut self, bar: &Bar) -> Option<IndicatorRecord> {
        self.stats.bars_seen += 1;
        if self.current.as_deref() != Some(bar.instrument_id.as_str()) {
            self.enter_instrument(&bar.instrument_id);
        }

        let target = self.calc.target_date;
        let on_target = bar.trade_date == target;
        if on_target && self.emitted_current {
            tracing::warn!(
                instrument_id = %bar.instrument_id,
                trade_date = %bar.trade_date,
                "duplicate target-date bar ignored"
            );
            self.stats.duplicates += 1;
            return None;
        }

        let range = self.state.range_snapshot();

        let valid = match bar.validate() {
            Ok(valid) => valid,
            Err(reason) => {
                if on_target {
                    self.observer.on_invalid_bar(&InvalidBarEvent {
                        trade_date: bar.trade_date,
                        instrument_id: &bar.instrument_id,
                        open: bar.open,
                        high: bar.high,
                        low: bar.low,
                        close: bar.close,
                        adj_close: bar.adj_close,
                        volume: bar.volume,
                        reason: &reason,
                    });
                    self.stats.skipped_invalid += 1;
                    self.stats
                        .invalid_instruments
                        .insert(bar.instrument_id.clone());
                } else {
                    tracing::debug!(
                        instrument_id = %bar.instrument_id,
                        trade_date = %bar.trade_date,
                        %reason,
                        "invalid bar excluded from warmup"
                    );
                }
                return None;
            }
        };

        let pick = pick_for_indicators(bar.close, bar.adj_close);
        self.state.push_indicators(pick.price, &valid);
        self.state.push_range(&valid);

        if !on_target {
            return None;
        }
        self.emitted_current = true;

        if bar.has_corporate_action() {
            self.observer.on_corporate_action(&CorporateActionEvent {
                trade_date: bar.trade_date,
                instrument_id: &bar.instrument_id,
                event_code: bar.corporate_action_event(),
                hint_code: bar.corporate_action_hint(),
                candidate_basis: pick.basis,
                candidate_price: pick.price,
                close: bar.close,
                adj_close: bar.adj_close,
            });
            self.stats.corporate_actions += 1;
            self.stats.emitted += 1;
            return Some(self.neutral_record(bar, &valid));
        }

        let features = self.features(&valid, &range);
        let class = classify(&features, &self.calc.config);
        if !class.window_sufficient() {
            self.observer.on_insufficient_window(&InsufficientWindowEvent {
                trade_date: bar.trade_date,
                instrument_id: &bar.instrument_id,
                missing: &class.missing,
                counts: self.state.counts(),
            });
            self.stats.insufficient_windows += 1;
        }

        let continuity = compute_from_prev(
            &bar.instrument_id,
            bar.trade_date,
            class.pattern,
            self.prev.get(&bar.instrument_id),
        );

        self.stats.emitted += 1;
        Some(IndicatorRecord {
            instrument_id: bar.instrument_id.clone(),
            trade_date: bar.trade_date,
            open: round4(valid.open),
            high: round4(valid.high),
            low: round4(valid.low),
            close: round4(valid.close),
            volume: valid.volume,
            price_basis: pick.basis,
            price_used: round4(pick.price),
            ma20: features.ma20.map(round4),
            ma50: features.ma50.map(round4),
            ma200: features.ma200.map(round4),
            rsi14: features.rsi14.map(round2),
            atr14: features.atr14.map(round4),
            support_20d: features.support_20d.map(round4),
            resistance_20d: features.resistance_20d.map(round4),
            volume_avg_20d: features.volume_avg_20d.map(round4),
            volume_ratio: features.volume_ratio.map(round4),
            decision: class.decision,
            pattern: class.pattern,
            volume_label: class.volume_label,
            signal_first_seen: continuity.first_seen,
            signal_age_days: continuity.age_days,
        })
    }

    fn enter_instrument(&mut self, instrument_id: &str) {
        tracing::debug!(instrument_id, "rolling state reset");
        self.state.reset();
        self.current = Some(instrument_id.to_string());
        self.emitted_current = false;
        self.stats.instruments_seen += 1;
    }

    fn features(&self, bar: &ValidBar, range: &RangeSnapshot) -> FeatureBundle {
        let volume_ratio = range
            .volume_avg
            .filter(|avg| *avg > 0.0)
            .map(|avg| bar.volume / avg);
        FeatureBundle {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            ma20: self.state.sma20.value(),
            ma50: self.state.sma50.value(),
            ma200: self.state.sma200.value(),
            rsi14: self.state.rsi.value(),
            atr14: self.state.atr.value(),
            support_20d: range.support,
            resistance_20d: range.resistance,
            volume_avg_20d: range.volume_avg,
            volume_ratio,
        }
    }

    /// Indicator-free record for a suspected corporate-action day.
    fn neutral_record(&self, bar: &Bar, valid: &ValidBar) -> IndicatorRecord {
        let PricePick { basis, price } = pick_for_trading(Some(valid.close));
        let continuity = compute_from_prev(
            &bar.instrument_id,
            bar.trade_date,
            PatternCode::Unclassified,
            self.prev.get(&bar.instrument_id),
        );
        IndicatorRecord {
            instrument_id: bar.instrument_id.clone(),
            trade_date: bar.trade_date,
            open: round4(valid.open),
            high: round4(valid.high),
            low: round4(valid.low),
            close: round4(valid.close),
            volume: valid.volume,
            price_basis: basis,
            price_used: round4(price),
            ma20: None,
            ma50: None,
            ma200: None,
            rsi14: None,
            atr14: None,
            support_20d: None,
            resistance_20d: None,
            volume_avg_20d: None,
            volume_ratio: None,
            decision: DecisionCode::Avoid,
            pattern: PatternCode::Unclassified,
            volume_label: VolumeLabel::Dormant,
            signal_first_seen: continuity.first_seen,
            signal_age_days: continuity.age_days,
        }
    }
}

impl<'a, I, O> Iterator for SignalStream<'a, I, O>
where
    I: Iterator,
    I::Item: Borrow<Bar>,
    O: GuardObserver,
{
    type Item = IndicatorRecord;

    fn next(&mut self) -> Option<IndicatorRecord> {
        loop {
            let item = self.bars.next()?;
            if let Some(record) = self.process(item.borrow()) {
                return Some(record);
            }
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// Prices, averages, ATR and ratios.
pub fn round4(value: f64) -> f64 {
    round_to(value, 4)
}

/// RSI.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::observer::NoopObserver;

    fn day(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i)
    }

    fn series(id: &str, n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let c = 50.0 + i as f64 * 0.25;
                Bar::new(id, day(i as i64), c - 0.1, c + 0.5, c - 0.5, c, 1000.0)
            })
            .collect()
    }

    #[test]
    fn rounding() {
        assert_eq!(round4(1.234_567), 1.2346);
        assert_eq!(round2(55.555_1), 55.56);
        assert_eq!(round4(-0.000_04), -0.0);
    }

    #[test]
    fn emits_only_target_date() {
        let bars = series("A", 30);
        let calc = SignalCalculator::new(SignalConfig::default(), day(29));
        let out = calc.run(&bars, &PrevSnapshots::new(), NoopObserver);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].trade_date, day(29));
        assert_eq!(out.stats.emitted, 1);
        assert_eq!(out.stats.bars_seen, 30);
    }

    #[test]
    fn missing_target_date_emits_nothing() {
        let bars = series("A", 30);
        let calc = SignalCalculator::new(SignalConfig::default(), day(100));
        let out = calc.run(&bars, &PrevSnapshots::new(), NoopObserver);
        assert!(out.records.is_empty());
    }

    #[test]
    fn state_resets_between_instruments() {
        let mut bars = series("A", 260);
        bars.extend(series("B", 30));
        let calc = SignalCalculator::new(SignalConfig::default(), day(29));
        let out = calc.run(&bars, &PrevSnapshots::new(), NoopObserver);
        let b = out.records.iter().find(|r| r.instrument_id == "B").unwrap();
        // 30 bars of B only: no 50/200-day averages, whatever A had.
        assert!(b.ma20.is_some());
        assert!(b.ma50.is_none());
        assert!(b.ma200.is_none());
        assert_eq!(out.stats.instruments_seen, 2);
    }

    #[test]
    fn duplicate_target_bar_emits_once() {
        let mut bars = series("A", 30);
        bars.push(bars[29].clone());
        let calc = SignalCalculator::new(SignalConfig::default(), day(29));
        let out = calc.run(&bars, &PrevSnapshots::new(), NoopObserver);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.stats.duplicates, 1);
    }

    #[test]
    fn adjusted_close_feeds_averages_not_atr() {
        let bars: Vec<Bar> = series("A", 30)
            .into_iter()
            .map(|b| {
                let adj = b.close.unwrap() / 2.0;
                b.with_adj_close(adj)
            })
            .collect();
        let calc = SignalCalculator::new(SignalConfig::default(), day(29));
        let out = calc.run(&bars, &PrevSnapshots::new(), NoopObserver);
        let r = &out.records[0];
        assert_eq!(r.price_basis, crate::domain::PriceBasis::Adjusted);
        assert!(r.ma20.unwrap() < r.close / 1.5);
        // Real range is 1.0 wide with 0.25 steps; ATR stays near 1.0.
        assert!((r.atr14.unwrap() - 1.0).abs() < 0.01);
    }

    #[test]
    fn stream_is_lazy() {
        let mut bars = series("A", 30);
        bars.extend(series("B", 30));
        let calc = SignalCalculator::new(SignalConfig::default(), day(29));
        let prev = PrevSnapshots::new();
        let mut stream = calc.stream(&bars, &prev, NoopObserver);
        let first = stream.next().unwrap();
        assert_eq!(first.instrument_id, "A");
        assert_eq!(stream.stats().bars_seen, 30);
        let second = stream.next().unwrap();
        assert_eq!(second.instrument_id, "B");
        assert!(stream.next().is_none());
    }
}
