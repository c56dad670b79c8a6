//! Fixed-capacity sliding buffer for the 20-day low/high/volume windows.
//!
//! Reads only report once the buffer is full, so a fresh instrument never
//! gets a support or resistance level built from a handful of bars.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "window capacity must be >= 1");
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append and trim to the last `capacity` values.
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    pub fn min(&self) -> Option<f64> {
        self.full_values().map(|v| v.fold(f64::INFINITY, f64::min))
    }

    pub fn max(&self) -> Option<f64> {
        self.full_values().map(|v| v.fold(f64::NEG_INFINITY, f64::max))
    }

    pub fn mean(&self) -> Option<f64> {
        self.full_values()
            .map(|v| v.sum::<f64>() / self.capacity as f64)
    }

    pub fn reset(&mut self) {
        self.values.clear();
    }

    fn full_values(&self) -> Option<impl Iterator<Item = f64> + '_> {
        self.is_full().then(|| self.values.iter().copied())
    }
}
