//! Per-instrument rolling state held during one chunk pass.

use crate::config::{ATR_PERIOD, RANGE_WINDOW, RSI_PERIOD, SMA_LONG, SMA_MEDIUM, SMA_SHORT};
use crate::domain::ValidBar;
use crate::indicators::{RollingWindow, SimpleMovingAverage, WilderAtr, WilderRsi};
use serde::Serialize;

/// How much history each accumulator has seen. Reported alongside
/// insufficient-window events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowCounts {
    pub sma20: usize,
    pub sma50: usize,
    pub sma200: usize,
    pub rsi_changes: usize,
    pub atr_samples: usize,
    pub range_bars: usize,
}

/// Support, resistance and average volume over the buffered bars.
/// Taken before the current bar is appended, so it never includes it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeSnapshot {
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub volume_avg: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RollingState {
    pub sma20: SimpleMovingAverage,
    pub sma50: SimpleMovingAverage,
    pub sma200: SimpleMovingAverage,
    pub rsi: WilderRsi,
    pub atr: WilderAtr,
    lows: RollingWindow,
    highs: RollingWindow,
    volumes: RollingWindow,
}

impl Default for RollingState {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingState {
    pub fn new() -> Self {
        Self {
            sma20: SimpleMovingAverage::new(SMA_SHORT),
            sma50: SimpleMovingAverage::new(SMA_MEDIUM),
            sma200: SimpleMovingAverage::new(SMA_LONG),
            rsi: WilderRsi::new(RSI_PERIOD),
            atr: WilderAtr::new(ATR_PERIOD),
            lows: RollingWindow::new(RANGE_WINDOW),
            highs: RollingWindow::new(RANGE_WINDOW),
            volumes: RollingWindow::new(RANGE_WINDOW),
        }
    }

    /// Back to the empty state. The only way history is discarded.
    pub fn reset(&mut self) {
        self.sma20.reset();
        self.sma50.reset();
        self.sma200.reset();
        self.rsi.reset();
        self.atr.reset();
        self.lows.reset();
        self.highs.reset();
        self.volumes.reset();
    }

    pub fn range_snapshot(&self) -> RangeSnapshot {
        RangeSnapshot {
            support: self.lows.min(),
            resistance: self.highs.max(),
            volume_avg: self.volumes.mean(),
        }
    }

    /// Feed the indicator price into the averages and RSI, and the real
    /// high/low/close into ATR.
    pub fn push_indicators(&mut self, price: f64, bar: &ValidBar) {
        self.sma20.push(price);
        self.sma50.push(price);
        self.sma200.push(price);
        self.rsi.push(price);
        self.atr.push(bar.high, bar.low, bar.close);
    }

    pub fn push_range(&mut self, bar: &ValidBar) {
        self.lows.push(bar.low);
        self.highs.push(bar.high);
        self.volumes.push(bar.volume);
    }

    pub fn counts(&self) -> WindowCounts {
        WindowCounts {
            sma20: self.sma20.count(),
            sma50: self.sma50.count(),
            sma200: self.sma200.count(),
            rsi_changes: self.rsi.changes(),
            atr_samples: self.atr.samples(),
            range_bars: self.lows.len(),
        }
    }
}
