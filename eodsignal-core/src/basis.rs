//! Price basis policy.
//!
//! Indicators run on the adjusted close so averages stay continuous across
//! splits and dividends. Anything that plans or executes trades must use the
//! raw close via [`pick_for_trading`].

use crate::domain::PriceBasis;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePick {
    pub basis: PriceBasis,
    pub price: f64,
}

/// Adjusted close when present, finite and positive, otherwise the raw
/// close (zero if the close itself is missing).
pub fn pick_for_indicators(close: Option<f64>, adj_close: Option<f64>) -> PricePick {
    match adj_close {
        Some(adj) if adj > 0.0 && adj.is_finite() => PricePick {
            basis: PriceBasis::Adjusted,
            price: adj,
        },
        _ => pick_for_trading(close),
    }
}

/// Always the raw close.
pub fn pick_for_trading(close: Option<f64>) -> PricePick {
    PricePick {
        basis: PriceBasis::Close,
        price: close.unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusted_wins_when_positive() {
        let pick = pick_for_indicators(Some(100.0), Some(50.0));
        assert_eq!(pick.basis, PriceBasis::Adjusted);
        assert_eq!(pick.price, 50.0);
    }

    #[test]
    fn unusable_adjusted_falls_back() {
        for adj in [None, Some(0.0), Some(-1.0), Some(f64::INFINITY), Some(f64::NAN)] {
            let pick = pick_for_indicators(Some(100.0), adj);
            assert_eq!(pick.basis, PriceBasis::Close);
            assert_eq!(pick.price, 100.0);
        }
    }

    #[test]
    fn missing_close_is_zero() {
        let pick = pick_for_indicators(None, None);
        assert_eq!(pick, PricePick { basis: PriceBasis::Close, price: 0.0 });
    }

    #[test]
    fn trading_ignores_adjustment() {
        let pick = pick_for_trading(Some(101.5));
        assert_eq!(pick.basis, PriceBasis::Close);
        assert_eq!(pick.price, 101.5);
    }
}
