use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reliability assumed for suppliers that have never been scored.
pub const DEFAULT_RELIABILITY_SCORE: f64 = 3.0;

/// A supplier as fetched by the caller.
///
/// `reliability_score` is conventionally within 0.0..=5.0 but is not clamped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub reliability_score: Option<f64>,
}

impl Supplier {
    pub fn reliability(&self) -> f64 {
        self.reliability_score.unwrap_or(DEFAULT_RELIABILITY_SCORE)
    }
}
