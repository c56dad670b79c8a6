//! Decision classifier.
//!
//! Hard overrides first, then a gated combination of trend, breakout,
//! volume and RSI. Anything that matches no rule is Avoid.

use crate::classify::features::FeatureBundle;
use crate::config::DecisionThresholds;
use crate::domain::{DecisionCode, PatternCode, VolumeLabel};

pub fn classify_decision(
    f: &FeatureBundle,
    pattern: PatternCode,
    volume_label: VolumeLabel,
    t: &DecisionThresholds,
) -> DecisionCode {
    if f.close <= 0.0 {
        return DecisionCode::Avoid;
    }
    match pattern {
        PatternCode::FalseBreakout => return DecisionCode::FalseBreakout,
        PatternCode::Climax => return DecisionCode::Avoid,
        _ if volume_label == VolumeLabel::Climax => return DecisionCode::Avoid,
        PatternCode::Distribution => return DecisionCode::Caution,
        _ => {}
    }
    if f.rsi14.is_some_and(|r| r >= t.rsi_ceiling) {
        return DecisionCode::Caution;
    }

    let vol_ok_buy =
        f.volume_ratio_at_least(t.buy_volume_ratio) || volume_label >= VolumeLabel::Burst;
    let vol_ok_confirm =
        f.volume_ratio_at_least(t.confirm_volume_ratio) || volume_label >= VolumeLabel::Active;
    let rsi_warn = f.rsi14.is_some_and(|r| r >= t.rsi_warn);
    let trend_ok = trend_ok(f);
    let is_breakout = f.closed_above_resistance();

    if (is_breakout || trend_ok) && vol_ok_buy && !rsi_warn {
        DecisionCode::Buy
    } else if pattern.is_constructive() && vol_ok_confirm {
        DecisionCode::NeedsConfirmation
    } else if (is_breakout || trend_ok) && !vol_ok_confirm {
        DecisionCode::NeedsConfirmation
    } else {
        DecisionCode::Avoid
    }
}

/// close > MA20 >= MA50, and MA50 >= MA200 when MA200 is known.
fn trend_ok(f: &FeatureBundle) -> bool {
    let (Some(m20), Some(m50)) = (f.ma20, f.ma50) else {
        return false;
    };
    f.close > m20 && m20 >= m50 && f.ma200.map_or(true, |m200| m50 >= m200)
}
