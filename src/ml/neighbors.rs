/*!
 * # Nearest-Neighbor Classification
 *
 * Feature standardization and a brute-force k-nearest-neighbor classifier
 * over small, dense feature matrices.
 */

use std::collections::BTreeMap;

/// Per-feature affine rescaling to zero mean and unit variance.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Learns column means and population standard deviations.
    ///
    /// A zero-variance column keeps a scale of 1 so it standardizes to 0.
    /// Rows must share a width; an empty matrix yields an empty scaler.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let n = rows.len() as f64;

        let means: Vec<f64> = (0..width)
            .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n)
            .collect();

        let scales = (0..width)
            .map(|j| {
                let var = rows.iter().map(|r| (r[j] - means[j]).powi(2)).sum::<f64>() / n;
                let std = var.sqrt();
                if std == 0.0 {
                    1.0
                } else {
                    std
                }
            })
            .collect();

        Self { means, scales }
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .zip(self.means.iter().zip(&self.scales))
                    .map(|(v, (mean, scale))| (v - mean) / scale)
                    .collect()
            })
            .collect()
    }

    pub fn fit_transform(rows: &[Vec<f64>]) -> (Self, Vec<Vec<f64>>) {
        let scaler = Self::fit(rows);
        let scaled = scaler.transform(rows);
        (scaler, scaled)
    }
}

/// Majority-vote k-nearest-neighbor classifier with Euclidean distance.
///
/// Equidistant neighbors are taken in training order; a tied vote goes to
/// the smallest label under `Ord`.
#[derive(Debug, Clone)]
pub struct KNearestNeighbors<L> {
    k: usize,
    features: Vec<Vec<f64>>,
    labels: Vec<L>,
}

impl<L: Clone + Ord> KNearestNeighbors<L> {
    /// Stores the training set. `k` is clamped to `1..=len`.
    pub fn fit(k: usize, features: Vec<Vec<f64>>, labels: Vec<L>) -> Self {
        debug_assert_eq!(features.len(), labels.len());
        let k = k.clamp(1, features.len().max(1));
        Self {
            k,
            features,
            labels,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Predicts the label of one point; `None` when trained on nothing.
    pub fn predict_one(&self, point: &[f64]) -> Option<L> {
        if self.features.is_empty() {
            return None;
        }

        let mut distances: Vec<(f64, usize)> = self
            .features
            .iter()
            .enumerate()
            .map(|(idx, row)| (euclidean(row, point), idx))
            .collect();
        // Stable sort keeps training order among equal distances.
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut votes: BTreeMap<&L, usize> = BTreeMap::new();
        for &(_, idx) in distances.iter().take(self.k) {
            *votes.entry(&self.labels[idx]).or_insert(0) += 1;
        }

        // Labels iterate ascending; strict `>` keeps the smallest on a tie.
        let mut best: Option<(&L, usize)> = None;
        for (label, count) in votes {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label.clone())
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scaler_produces_zero_mean_unit_variance() {
        let rows = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let (_, scaled) = StandardScaler::fit_transform(&rows);
        for j in 0..2 {
            let col: Vec<f64> = scaled.iter().map(|r| r[j]).collect();
            let mean = col.iter().sum::<f64>() / 3.0;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0;
            assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
            assert_relative_eq!(var, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn constant_column_standardizes_to_zero() {
        let rows = vec![vec![4.0], vec![4.0]];
        let (_, scaled) = StandardScaler::fit_transform(&rows);
        assert_eq!(scaled, vec![vec![0.0], vec![0.0]]);
    }

    #[test]
    fn majority_vote_among_three() {
        let knn = KNearestNeighbors::fit(
            3,
            vec![vec![0.0], vec![0.1], vec![0.2], vec![5.0]],
            vec!["a", "a", "b", "b"],
        );
        assert_eq!(knn.predict_one(&[0.05]), Some("a"));
        assert_eq!(knn.predict_one(&[5.1]), Some("b"));
    }

    #[test]
    fn tied_vote_prefers_smallest_label() {
        let knn = KNearestNeighbors::fit(2, vec![vec![0.0], vec![1.0]], vec!["z", "m"]);
        assert_eq!(knn.predict_one(&[0.5]), Some("m"));
    }

    #[test]
    fn k_is_clamped_to_training_size() {
        let knn = KNearestNeighbors::fit(3, vec![vec![0.0]], vec![1u8]);
        assert_eq!(knn.k(), 1);
        assert_eq!(knn.predict_one(&[9.0]), Some(1));
    }

    #[test]
    fn empty_model_predicts_nothing() {
        let knn: KNearestNeighbors<u8> = KNearestNeighbors::fit(3, vec![], vec![]);
        assert_eq!(knn.predict_one(&[0.0]), None);
    }
}
