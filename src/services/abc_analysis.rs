use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::models::Product;

/// Upper cumulative-share bound (inclusive) of class A.
pub const CLASS_A_CUTOFF: f64 = 0.80;
/// Upper cumulative-share bound (inclusive) of class B.
pub const CLASS_B_CUTOFF: f64 = 0.95;

/// Pareto value class.
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
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    /// Class for a cumulative share of total value. An undefined share (NaN)
    /// falls through to C.
    pub fn for_cumulative_share(share: f64) -> Self {
        if share <= CLASS_A_CUTOFF {
            AbcClass::A
        } else if share <= CLASS_B_CUTOFF {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcRecord {
    pub product_id: i64,
    pub name: String,
    pub value: f64,
    pub class: AbcClass,
}

/// Classifies the catalog by the value of stock on hand.
///
/// Products are ranked by `price * stock_level` descending (ties keep catalog
/// order) and classed by the cumulative share of total value they reach.
#[instrument(skip(products), fields(product_count = products.len()))]
pub fn abc_analysis(products: &[Product]) -> Vec<AbcRecord> {
    if products.is_empty() {
        return Vec::new();
    }

    let mut valued: Vec<(&Product, f64)> = products.iter().map(|p| (p, p.stock_value())).collect();
    valued.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total: f64 = valued.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        warn!("Catalog carries no stock value; every product is classed C");
    }

    let mut cumulative = 0.0;
    let records: Vec<AbcRecord> = valued
        .into_iter()
        .map(|(product, value)| {
            cumulative += value;
            let share = if total > 0.0 {
                cumulative / total
            } else {
                f64::NAN
            };
            AbcRecord {
                product_id: product.id,
                name: product.name.clone(),
                value,
                class: AbcClass::for_cumulative_share(share),
            }
        })
        .collect();

    info!(
        a = records.iter().filter(|r| r.class == AbcClass::A).count(),
        b = records.iter().filter(|r| r.class == AbcClass::B).count(),
        c = records.iter().filter(|r| r.class == AbcClass::C).count(),
        "Completed ABC classification"
    );
    records
}
