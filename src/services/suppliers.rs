/*!
 * # Supplier Risk Classification
 *
 * Synthesizes delivery-time and defect-rate features from each supplier's
 * reliability score, assigns a ground-truth tier from the score alone, and
 * re-predicts the tier with a nearest-neighbor vote over the standardized
 * features of the same batch.
 *
 * The prediction is a self-consistency check: the classifier is fit and
 * evaluated on identical data, so `predicted_tier` only departs from `tier`
 * when feature noise lands a supplier among another tier's neighbors.
 */

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::{DEFAULT_DEFECT_NOISE_STD, DEFAULT_DELIVERY_NOISE_STD};
use crate::ml::{KNearestNeighbors, NoiseSource, StandardScaler};
use crate::models::Supplier;

/// Neighbors consulted per prediction (fewer when the batch is smaller).
pub const MAX_NEIGHBORS: usize = 3;

/// Supplier performance tier.
///
/// Variant order is the alphabetical order of the labels; the
/// nearest-neighbor vote breaks ties toward the earliest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum SupplierTier {
    #[serde(rename = "Average")]
    #[strum(serialize = "Average")]
    Average,
    #[serde(rename = "High Performance")]
    #[strum(serialize = "High Performance")]
    HighPerformance,
    #[serde(rename = "Risk")]
    #[strum(serialize = "Risk")]
    Risk,
}

impl SupplierTier {
    /// Ground-truth tier from reliability alone.
    pub fn from_reliability(score: f64) -> Self {
        if score >= 4.0 {
            SupplierTier::HighPerformance
        } else if score >= 2.5 {
            SupplierTier::Average
        } else {
            SupplierTier::Risk
        }
    }
}

/// Spread of the Gaussian perturbations applied to synthesized features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureNoise {
    pub delivery_std: f64,
    pub defect_std: f64,
}

impl Default for FeatureNoise {
    fn default() -> Self {
        Self {
            delivery_std: DEFAULT_DELIVERY_NOISE_STD,
            defect_std: DEFAULT_DEFECT_NOISE_STD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierClassification {
    pub id: i64,
    pub name: String,
    pub reliability_score: f64,
    /// Days, at least 1, one decimal
    pub delivery_time: f64,
    /// Percent, at least 0, two decimals
    pub defect_rate: f64,
    pub tier: SupplierTier,
    pub predicted_tier: SupplierTier,
}

/// `max(1, 10 - 1.5 * score + noise)` rounded to one decimal.
pub fn synth_delivery_time(score: f64, noise: f64) -> f64 {
    round_to((10.0 - 1.5 * score + noise).max(1.0), 1)
}

/// `max(0, 5 - 0.8 * score + noise)` rounded to two decimals.
pub fn synth_defect_rate(score: f64, noise: f64) -> f64 {
    round_to((5.0 - 0.8 * score + noise).max(0.0), 2)
}

/// Rounds to `decimals` places with ties going to the even neighbour, so an
/// exactly representable 6.25 becomes 6.2 rather than 6.3.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        2.0 * (scaled / 2.0).round()
    } else {
        scaled.round()
    };
    rounded / factor
}

/// Classifies every supplier into a risk tier.
///
/// Each supplier draws its delivery noise then its defect noise from `noise`,
/// in input order, so a seeded source reproduces the whole result.
#[instrument(skip(suppliers, noise), fields(supplier_count = suppliers.len()))]
pub fn classify_suppliers<N: NoiseSource + ?Sized>(
    suppliers: &[Supplier],
    spread: &FeatureNoise,
    noise: &mut N,
) -> Vec<SupplierClassification> {
    if suppliers.is_empty() {
        return Vec::new();
    }

    let mut rows: Vec<SupplierClassification> = suppliers
        .iter()
        .map(|s| {
            let score = s.reliability();
            let delivery_noise = noise.gaussian(spread.delivery_std);
            let defect_noise = noise.gaussian(spread.defect_std);
            let tier = SupplierTier::from_reliability(score);
            SupplierClassification {
                id: s.id,
                name: s.name.clone(),
                reliability_score: score,
                delivery_time: synth_delivery_time(score, delivery_noise),
                defect_rate: synth_defect_rate(score, defect_noise),
                tier,
                predicted_tier: tier,
            }
        })
        .collect();

    let features: Vec<Vec<f64>> = rows
        .iter()
        .map(|r| vec![r.delivery_time, r.defect_rate])
        .collect();
    let (_, scaled) = StandardScaler::fit_transform(&features);

    let k = MAX_NEIGHBORS.min(rows.len());
    let labels: Vec<SupplierTier> = rows.iter().map(|r| r.tier).collect();
    let model = KNearestNeighbors::fit(k, scaled.clone(), labels);

    for (row, point) in rows.iter_mut().zip(&scaled) {
        if let Some(predicted) = model.predict_one(point) {
            row.predicted_tier = predicted;
        }
    }

    let disagreements = rows.iter().filter(|r| r.tier != r.predicted_tier).count();
    debug!(k, disagreements, "nearest-neighbor consistency check");
    info!(
        suppliers = rows.len(),
        disagreements, "Completed supplier classification"
    );
    rows
}
