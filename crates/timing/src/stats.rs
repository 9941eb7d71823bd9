//! Dispersion statistics over small samples of task durations.

/// Collects duration samples and answers min/max/mean/stddev queries.
#[derive(Debug, Default)]
pub struct Samples {
    values: Vec<f64>,
}

impl Samples {
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().min_by(|a, b| a.total_cmp(b))
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().max_by(|a, b| a.total_cmp(b))
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Sample standard deviation. Needs at least two samples.
    pub fn stddev(&self) -> Option<f64> {
        if self.values.len() < 2 {
            return None;
        }
        let mean = self.mean()?;
        let variance =
            self.values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / (self.values.len() - 1) as f64;
        Some(variance.sqrt())
    }
}

/// Round to two decimal places for emission. Accumulation always happens on
/// unrounded values so rounding error does not compound.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
