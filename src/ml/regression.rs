use serde::{Deserialize, Serialize};

/// A fitted straight line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    /// Ordinary least squares fit of `y` against `x`.
    ///
    /// Returns `None` for fewer than two points or mismatched lengths. When
    /// every `x` is identical the minimum-norm solution is used: zero slope
    /// through the mean of `y`.
    pub fn fit(x: &[f64], y: &[f64]) -> Option<Self> {
        if x.len() != y.len() || x.len() < 2 {
            return None;
        }

        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        // Centered sums keep precision for large day ordinals.
        let (sxy, sxx) = x
            .iter()
            .zip(y)
            .fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
                let dx = xi - mean_x;
                (sxy + dx * (yi - mean_y), sxx + dx * dx)
            });

        let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
