//! Relative Strength Index (RSI), Wilder smoothing.
//!
//! The first push only records the close. The next `period` changes seed the
//! average gain and loss (`sum / period`); afterwards both follow
//! `avg = (avg * (period - 1) + x) / period`.
//! RSI = 100 when the average loss is exactly zero, else
//! `100 - 100 / (1 + avg_gain / avg_loss)`.

#[derive(Debug, Clone)]
pub struct WilderRsi {
    period: usize,
    prev_close: Option<f64>,
    changes: usize,
    seed_gain: f64,
    seed_loss: f64,
    avg: Option<(f64, f64)>,
}

impl WilderRsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            prev_close: None,
            changes: 0,
            seed_gain: 0.0,
            seed_loss: 0.0,
            avg: None,
        }
    }

    pub fn push(&mut self, close: f64) {
        let Some(prev) = self.prev_close.replace(close) else {
            return;
        };
        let change = close - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        self.changes += 1;

        let n = self.period as f64;
        match self.avg.as_mut() {
            Some((avg_gain, avg_loss)) => {
                *avg_gain = (*avg_gain * (n - 1.0) + gain) / n;
                *avg_loss = (*avg_loss * (n - 1.0) + loss) / n;
            }
            None => {
                self.seed_gain += gain;
                self.seed_loss += loss;
                if self.changes == self.period {
                    self.avg = Some((self.seed_gain / n, self.seed_loss / n));
                }
            }
        }
    }

    pub fn value(&self) -> Option<f64> {
        let (avg_gain, avg_loss) = self.avg?;
        if avg_loss == 0.0 {
            Some(100.0)
        } else {
            Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
        }
    }

    /// Number of close-to-close changes observed.
    pub fn changes(&self) -> usize {
        self.changes
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.period);
    }
}
