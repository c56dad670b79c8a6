//! Discrete signal codes consumed by ranking and portfolio logic.
//!
//! The integer encodings are part of the output contract and must not change.
//! All three enums serialize as their integer code.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} code out of range: {value}")]
pub struct CodeError {
    pub kind: &'static str,
    pub value: u8,
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code ),+
        }

        impl $name {
            pub fn code(self) -> u8 {
                self as u8
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.code()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = CodeError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $code => Ok($name::$variant), )+
                    _ => Err(CodeError { kind: $kind, value }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.code())
            }
        }
    };
}

coded_enum! {
    /// Chart-pattern classification of a bar.
    PatternCode, "pattern" {
        /// Unclassifiable (bad close or corporate-action neutral record).
        Unclassified = 0,
        BaseSideways = 1,
        EarlyUptrend = 2,
        Accumulation = 3,
        Breakout = 4,
        StrongBreakout = 5,
        BreakoutRetest = 6,
        PullbackHealthy = 7,
        Distribution = 8,
        Climax = 9,
        FalseBreakout = 10,
    }
}

coded_enum! {
    /// Trade-ability summary.
    DecisionCode, "decision" {
        FalseBreakout = 1,
        Avoid = 2,
        Caution = 3,
        NeedsConfirmation = 4,
        Buy = 5,
    }
}

coded_enum! {
    /// Relative volume regime versus the 20-day average.
    VolumeLabel, "volume label" {
        Dormant = 1,
        VeryLow = 2,
        Low = 3,
        Normal = 4,
        Active = 5,
        Burst = 6,
        StrongBurst = 7,
        Climax = 8,
    }
}

impl PatternCode {
    /// Constructive patterns that may earn a "needs confirmation" decision.
    pub fn is_constructive(self) -> bool {
        matches!(
            self,
            PatternCode::EarlyUptrend
                | PatternCode::Accumulation
                | PatternCode::Breakout
                | PatternCode::StrongBreakout
                | PatternCode::BreakoutRetest
                | PatternCode::PullbackHealthy
        )
    }
}

impl DecisionCode {
    /// Decisions a consumer may act on as a positive recommendation.
    pub fn is_strong(self) -> bool {
        self.code() >= DecisionCode::NeedsConfirmation.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip_through_u8() {
        for c in 0..=10u8 {
            assert_eq!(PatternCode::try_from(c).unwrap().code(), c);
        }
        for c in 1..=5u8 {
            assert_eq!(DecisionCode::try_from(c).unwrap().code(), c);
        }
        for c in 1..=8u8 {
            assert_eq!(VolumeLabel::try_from(c).unwrap().code(), c);
        }
    }

    #[test]
    fn out_of_range_codes_rejected() {
        assert!(PatternCode::try_from(11).is_err());
        assert!(DecisionCode::try_from(0).is_err());
        let err = VolumeLabel::try_from(9).unwrap_err();
        assert_eq!(err.to_string(), "volume label code out of range: 9");
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&PatternCode::Breakout).unwrap(), "4");
        let d: DecisionCode = serde_json::from_str("5").unwrap();
        assert_eq!(d, DecisionCode::Buy);
    }

    #[test]
    fn strong_decisions() {
        assert!(DecisionCode::Buy.is_strong());
        assert!(DecisionCode::NeedsConfirmation.is_strong());
        assert!(!DecisionCode::Caution.is_strong());
    }
}
