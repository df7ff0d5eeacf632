// observables.rs - streaming moments for phase-transition indicators

use crate::error_analysis::integrated_autocorr_time;

/// Streaming accumulator over an observable series, keeping the raw samples
/// plus running power sums up to the fourth moment. The fourth moment feeds
/// the Binder cumulant, the cheap finite-size locator of the critical
/// temperature.
#[derive(Default)]
pub struct TimeSeriesAccumulator {
    samples: Vec<f64>,
    sum: f64,
    sum_sq: f64,
    sum_4th: f64,
}

impl TimeSeriesAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.samples.push(value);
        self.sum += value;
        self.sum_sq += value * value;
        self.sum_4th += value.powi(4);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum / self.samples.len() as f64
        }
    }

    /// Second central moment, `E[x²] − E[x]²`.
    pub fn variance(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let n = self.samples.len() as f64;
        self.sum_sq / n - (self.sum / n).powi(2)
    }

    /// Raw second moment `E[x²]`.
    pub fn moment2(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum_sq / self.samples.len() as f64
        }
    }

    /// Raw fourth moment `E[x⁴]`.
    pub fn moment4(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum_4th / self.samples.len() as f64
        }
    }

    /// Binder cumulant `U4 = 1 − E[x⁴] / (3 E[x²]²)`. Curves for different
    /// lattice sizes cross at the critical temperature.
    pub fn binder_cumulant(&self) -> f64 {
        let m2 = self.moment2();
        if m2 > 0.0 {
            1.0 - self.moment4() / (3.0 * m2 * m2)
        } else {
            0.0
        }
    }

    /// Integrated autocorrelation time of the recorded series.
    pub fn autocorrelation_time(&self) -> f64 {
        integrated_autocorr_time(&self.samples)
    }
}
