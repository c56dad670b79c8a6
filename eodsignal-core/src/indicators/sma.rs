//! Simple Moving Average (SMA).
//!
//! Running sum over a bounded queue of the last `period` values.
//! First valid value after exactly `period` pushes.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    window: VecDeque<f64>,
    sum: f64,
    count: usize,
}

impl SimpleMovingAverage {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            window: VecDeque::with_capacity(period),
            sum: 0.0,
            count: 0,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn push(&mut self, value: f64) {
        self.window.push_back(value);
        self.sum += value;
        if self.window.len() > self.period {
            if let Some(leaving) = self.window.pop_front() {
                self.sum -= leaving;
            }
        }
        self.count += 1;
    }

    /// Mean of the window, or `None` until `period` values have been pushed.
    pub fn value(&self) -> Option<f64> {
        (self.window.len() == self.period).then(|| self.sum / self.period as f64)
    }

    /// Total number of pushes since construction or the last reset.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
        self.count = 0;
    }
}
