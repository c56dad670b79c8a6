//! Domain types for the EOD signal engine

pub mod bar;
pub mod codes;
pub mod record;

pub use bar::{Bar, BarError, ValidBar};
pub use codes::{CodeError, DecisionCode, PatternCode, VolumeLabel};
pub use record::{IndicatorRecord, PrevSnapshot, PriceBasis};
