//! Pattern classifier.
//!
//! Rules are checked in a fixed priority order and the first match wins.
//! Several rules overlap (a retest near resistance can also read as
//! accumulation); the order below decides those cases and is part of the
//! output contract.

use crate::classify::features::{distance_pct, FeatureBundle};
use crate::config::PatternThresholds;
use crate::domain::PatternCode;

/// RSI at or above which a high-volume bar reads as a blow-off.
const CLIMAX_RSI: f64 = 80.0;
/// Candle body (fraction of close) that counts as a wide-range climax bar.
const CLIMAX_BODY_PCT: f64 = 0.03;
/// Close within this fraction of resistance counts as a retest.
const RETEST_BAND: f64 = 0.015;
const PULLBACK_MA20_BAND: f64 = 0.02;
const PULLBACK_SUPPORT_BAND: f64 = 0.03;
const PULLBACK_RSI_MIN: f64 = 40.0;
const PULLBACK_RSI_MAX: f64 = 70.0;
const RETEST_RSI_MIN: f64 = 45.0;
const EARLY_UPTREND_RSI_MAX: f64 = 75.0;

pub fn classify_pattern(f: &FeatureBundle, t: &PatternThresholds) -> PatternCode {
    if f.close <= 0.0 {
        return PatternCode::Unclassified;
    }

    let burst = f.volume_ratio_at_least(t.burst_volume_ratio);
    let strong = f.volume_ratio_at_least(t.strong_volume_ratio);
    let top_quartile = f.close_in_top_quartile();
    let stacked = f.bullish_stack();
    let above_resistance = f.closed_above_resistance();

    if let Some(res) = f.resistance_20d {
        if f.high > res && f.close <= res {
            return PatternCode::FalseBreakout;
        }
    }

    if f.rsi14.is_some_and(|r| r >= CLIMAX_RSI)
        && (strong || burst)
        && (top_quartile || f.body_pct() >= CLIMAX_BODY_PCT)
    {
        return PatternCode::Climax;
    }

    if above_resistance && strong && top_quartile && f.rsi14.map_or(true, |r| r < CLIMAX_RSI) {
        return PatternCode::StrongBreakout;
    }

    if above_resistance && burst {
        return PatternCode::Breakout;
    }

    if let Some(res) = f.resistance_20d {
        let near = distance_pct(f.close, res).is_some_and(|d| d <= RETEST_BAND);
        let holding = f.ma20.is_some_and(|m| f.close >= m)
            || f.rsi14.is_some_and(|r| r >= RETEST_RSI_MIN);
        if near && stacked && f.close >= res * (1.0 - RETEST_BAND) && holding {
            return PatternCode::BreakoutRetest;
        }
    }

    if (strong && !top_quartile) || (burst && f.close_in_bottom_half()) {
        return PatternCode::Distribution;
    }

    if stacked {
        let near_ma20 = f
            .ma20
            .and_then(|m| distance_pct(f.close, m))
            .is_some_and(|d| d <= PULLBACK_MA20_BAND);
        let near_support = f
            .support_20d
            .and_then(|s| distance_pct(f.close, s))
            .is_some_and(|d| d <= PULLBACK_SUPPORT_BAND);
        let rsi_ok = f
            .rsi14
            .map_or(true, |r| (PULLBACK_RSI_MIN..=PULLBACK_RSI_MAX).contains(&r));
        if (near_ma20 || near_support) && rsi_ok {
            return PatternCode::PullbackHealthy;
        }
    }

    if !stacked && burst && top_quartile {
        return PatternCode::Accumulation;
    }

    if let (Some(m20), Some(m50)) = (f.ma20, f.ma50) {
        if f.close > m20
            && f.close > m50
            && m20 >= m50
            && f.rsi14.map_or(true, |r| r < EARLY_UPTREND_RSI_MAX)
        {
            return PatternCode::EarlyUptrend;
        }
    }

    PatternCode::BaseSideways
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quiet bar in a bullish stack, well away from resistance and the MAs.
    fn base() -> FeatureBundle {
        FeatureBundle {
            open: 95.0,
            high: 96.0,
            low: 94.0,
            close: 95.0,
            volume: 1000.0,
            ma20: Some(90.0),
            ma50: Some(85.0),
            ma200: Some(80.0),
            rsi14: Some(60.0),
            atr14: Some(2.0),
            support_20d: Some(88.0),
            resistance_20d: Some(100.0),
            volume_avg_20d: Some(1000.0),
            volume_ratio: Some(1.0),
        }
    }

    fn classify(f: &FeatureBundle) -> PatternCode {
        classify_pattern(f, &PatternThresholds::default())
    }

    #[test]
    fn non_positive_close_is_unclassified() {
        let f = FeatureBundle { close: 0.0, ..base() };
        assert_eq!(classify(&f), PatternCode::Unclassified);
    }

    #[test]
    fn false_breakout_beats_everything() {
        let f = FeatureBundle {
            high: 103.0,
            close: 99.5,
            rsi14: Some(85.0),
            volume_ratio: Some(3.0),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::FalseBreakout);
    }

    #[test]
    fn climax_on_hot_rsi_and_volume() {
        let f = FeatureBundle {
            open: 100.0,
            high: 111.0,
            low: 100.0,
            close: 110.0,
            rsi14: Some(82.0),
            volume_ratio: Some(1.6),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::Climax);
    }

    #[test]
    fn strong_breakout() {
        let f = FeatureBundle {
            open: 101.0,
            high: 111.0,
            low: 101.0,
            close: 110.0,
            rsi14: Some(65.0),
            volume_ratio: Some(2.5),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::StrongBreakout);
    }

    #[test]
    fn plain_breakout_on_burst_volume() {
        let f = FeatureBundle {
            open: 101.0,
            high: 111.0,
            low: 101.0,
            close: 110.0,
            rsi14: Some(60.0),
            volume_ratio: Some(1.8),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::Breakout);
    }

    #[test]
    fn breakout_retest_near_resistance() {
        let f = FeatureBundle {
            open: 99.0,
            high: 100.0,
            low: 98.5,
            close: 99.0,
            volume_ratio: Some(0.9),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::BreakoutRetest);
    }

    #[test]
    fn distribution_on_weak_close_with_volume() {
        let f = FeatureBundle {
            open: 95.0,
            high: 97.0,
            low: 93.0,
            close: 94.0,
            ma20: Some(97.0),
            ma50: Some(98.0),
            ma200: Some(80.0),
            volume_ratio: Some(1.7),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::Distribution);
    }

    #[test]
    fn strong_volume_below_top_quartile_is_distribution() {
        let f = FeatureBundle {
            open: 95.0,
            high: 97.0,
            low: 93.0,
            close: 95.6, // position 0.65
            ma20: Some(97.0),
            ma50: Some(98.0),
            ma200: Some(80.0),
            volume_ratio: Some(2.2),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::Distribution);
    }

    #[test]
    fn pullback_to_ma20() {
        let f = FeatureBundle {
            open: 91.0,
            high: 92.0,
            low: 90.0,
            close: 91.0,
            rsi14: Some(50.0),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::PullbackHealthy);
    }

    #[test]
    fn pullback_rejected_when_rsi_too_hot() {
        let f = FeatureBundle {
            open: 91.0,
            high: 92.0,
            low: 90.0,
            close: 91.0,
            rsi14: Some(72.0),
            ..base()
        };
        // Falls through to early uptrend (close > MA20 > MA50, RSI < 75)
        assert_eq!(classify(&f), PatternCode::EarlyUptrend);
    }

    #[test]
    fn accumulation_without_stack() {
        let f = FeatureBundle {
            open: 94.0,
            high: 96.0,
            low: 94.0,
            close: 95.8,
            ma20: Some(96.5),
            ma50: Some(97.0),
            ma200: Some(99.0),
            volume_ratio: Some(1.6),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::Accumulation);
    }

    #[test]
    fn early_uptrend() {
        assert_eq!(classify(&base()), PatternCode::EarlyUptrend);
    }

    #[test]
    fn early_uptrend_needs_rsi_below_75() {
        let f = FeatureBundle {
            rsi14: Some(76.0),
            ..base()
        };
        assert_eq!(classify(&f), PatternCode::BaseSideways);
    }

    #[test]
    fn sideways_without_history() {
        let f = FeatureBundle {
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.0,
            volume: 100.0,
            ..Default::default()
        };
        assert_eq!(classify(&f), PatternCode::BaseSideways);
    }
}
