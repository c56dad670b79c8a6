//! Average True Range (ATR), Wilder smoothing.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! The first push has no previous close, so its TR is high-low.
//! Seed: mean of the first `period` true ranges, then
//! `atr = (atr * (period - 1) + tr) / period`.

#[derive(Debug, Clone)]
pub struct WilderAtr {
    period: usize,
    prev_close: Option<f64>,
    samples: usize,
    seed_sum: f64,
    atr: Option<f64>,
}

/// True range of one bar given the previous close.
pub fn true_range(high: f64, low: f64, prev_close: Option<f64>) -> f64 {
    match prev_close {
        None => high - low,
        Some(pc) => (high - low).max((high - pc).abs()).max((low - pc).abs()),
    }
}

impl WilderAtr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            prev_close: None,
            samples: 0,
            seed_sum: 0.0,
            atr: None,
        }
    }

    pub fn push(&mut self, high: f64, low: f64, close: f64) {
        let tr = true_range(high, low, self.prev_close);
        self.prev_close = Some(close);
        self.samples += 1;

        let n = self.period as f64;
        match self.atr.as_mut() {
            Some(atr) => *atr = (*atr * (n - 1.0) + tr) / n,
            None => {
                self.seed_sum += tr;
                if self.samples == self.period {
                    self.atr = Some(self.seed_sum / n);
                }
            }
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.atr
    }

    /// Number of true ranges observed.
    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.period);
    }
}
