//! Signal engine: streaming per-instrument pass and supporting infrastructure.
//!
//! The engine consumes bars grouped by instrument and ascending by date,
//! drives the rolling indicators, applies the data-quality and
//! corporate-action guards, and emits one record per instrument for the
//! target date.

pub mod calculator;
pub mod observer;
pub mod parallel;
pub mod state;

pub use calculator::{
    round2, round4, PassOutput, PassStats, PrevSnapshots, SignalCalculator, SignalStream,
};
pub use observer::{
    CorporateActionEvent, GuardObserver, InsufficientWindowEvent, InvalidBarEvent, NoopObserver,
    TracingObserver,
};
pub use parallel::{chunk_by_instrument, run_chunks};
pub use state::{RangeSnapshot, RollingState, WindowCounts};
