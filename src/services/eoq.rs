use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::{DEFAULT_HOLDING_COST_RATE, DEFAULT_ORDERING_COST};
use crate::models::{Product, DEFAULT_ANNUAL_DEMAND};

/// Cost assumptions behind the economic order quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EoqPolicy {
    /// Fixed cost per replenishment order
    pub ordering_cost: f64,
    /// Yearly holding cost as a fraction of unit price
    pub holding_cost_rate: f64,
    /// Demand used when a product has none recorded
    pub default_annual_demand: i64,
}

impl Default for EoqPolicy {
    fn default() -> Self {
        Self {
            ordering_cost: DEFAULT_ORDERING_COST,
            holding_cost_rate: DEFAULT_HOLDING_COST_RATE,
            default_annual_demand: DEFAULT_ANNUAL_DEMAND,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum StockStatus {
    Understocked,
    Overstocked,
    Good,
}

impl StockStatus {
    /// Strict bounds: stock exactly at half or double the EOQ is Good.
    pub fn classify(stock_level: f64, eoq: f64) -> Self {
        if stock_level < 0.5 * eoq {
            StockStatus::Understocked
        } else if stock_level > 2.0 * eoq {
            StockStatus::Overstocked
        } else {
            StockStatus::Good
        }
    }

    /// Triage order: problems first.
    fn priority(&self) -> u8 {
        match self {
            StockStatus::Understocked => 0,
            StockStatus::Overstocked => 1,
            StockStatus::Good => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EoqRecord {
    pub id: i64,
    pub name: String,
    pub current_stock: i64,
    pub eoq: f64,
    pub status: StockStatus,
}

/// `sqrt(2 * demand * ordering_cost / holding_cost)`, or 0 when holding is free.
pub fn calculate_eoq(annual_demand: f64, ordering_cost: f64, holding_cost: f64) -> f64 {
    if holding_cost == 0.0 {
        return 0.0;
    }
    ((2.0 * annual_demand * ordering_cost) / holding_cost).sqrt()
}

/// Computes the EOQ of every product and triages stock against it.
///
/// The result lists Understocked products, then Overstocked, then Good,
/// each group in catalog order.
#[instrument(skip(products, policy), fields(product_count = products.len()))]
pub fn eoq_analysis(products: &[Product], policy: &EoqPolicy) -> Vec<EoqRecord> {
    let mut records: Vec<EoqRecord> = products
        .iter()
        .map(|p| {
            let demand = p.annual_demand_or(policy.default_annual_demand) as f64;
            let holding_cost = policy.holding_cost_rate * p.price;
            let eoq = calculate_eoq(demand, policy.ordering_cost, holding_cost);
            EoqRecord {
                id: p.id,
                name: p.name.clone(),
                current_stock: p.stock_level,
                eoq,
                status: StockStatus::classify(p.stock_level as f64, eoq),
            }
        })
        .collect();

    records.sort_by_key(|r| r.status.priority());

    info!(
        understocked = records
            .iter()
            .filter(|r| r.status == StockStatus::Understocked)
            .count(),
        overstocked = records
            .iter()
            .filter(|r| r.status == StockStatus::Overstocked)
            .count(),
        "Completed EOQ analysis"
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn product(id: i64, price: f64, stock_level: i64) -> Product {
        Product {
            id,
            name: format!("SKU-{}", id),
            price,
            stock_level,
            reorder_point: 10,
            supplier_id: 1,
            annual_demand: None,
            category: None,
        }
    }

    #[test]
    fn textbook_eoq() {
        assert_relative_eq!(calculate_eoq(1000.0, 50.0, 4.0), 25_000f64.sqrt(), epsilon = 1e-12);
        assert_eq!(calculate_eoq(1000.0, 50.0, 0.4), 500.0);
    }

    #[test]
    fn free_holding_means_zero_eoq() {
        assert_eq!(calculate_eoq(1000.0, 50.0, 0.0), 0.0);
    }

    #[test]
    fn half_eoq_is_good_not_understocked() {
        // price 2 -> holding cost 0.4 -> eoq exactly 500
        let records = eoq_analysis(&[product(1, 2.0, 250)], &EoqPolicy::default());
        assert_eq!(records[0].eoq, 500.0);
        assert_eq!(records[0].status, StockStatus::Good);
        let records = eoq_analysis(&[product(1, 2.0, 249)], &EoqPolicy::default());
        assert_eq!(records[0].status, StockStatus::Understocked);
    }

    #[test]
    fn double_eoq_is_good_not_overstocked() {
        let records = eoq_analysis(&[product(1, 2.0, 1000)], &EoqPolicy::default());
        assert_eq!(records[0].status, StockStatus::Good);
        let records = eoq_analysis(&[product(1, 2.0, 1001)], &EoqPolicy::default());
        assert_eq!(records[0].status, StockStatus::Overstocked);
    }

    #[test]
    fn price_twenty_uses_default_demand() {
        let records = eoq_analysis(&[product(1, 20.0, 100)], &EoqPolicy::default());
        assert_relative_eq!(records[0].eoq, 158.113_883_008_418_98, epsilon = 1e-9);
        assert_eq!(records[0].status, StockStatus::Good);
    }

    #[test]
    fn recorded_demand_overrides_default() {
        let mut p = product(1, 2.0, 600);
        p.annual_demand = Some(4000);
        let records = eoq_analysis(&[p], &EoqPolicy::default());
        assert_relative_eq!(records[0].eoq, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn free_product_has_zero_eoq_and_is_overstocked_when_stocked() {
        let catalog = [product(1, 0.0, 3), product(2, 0.0, 0)];
        let records = eoq_analysis(&catalog, &EoqPolicy::default());
        assert_eq!(records[0].eoq, 0.0);
        assert_eq!(records[0].status, StockStatus::Overstocked);
        assert_eq!(records[1].status, StockStatus::Good);
    }

    #[test]
    fn triage_order_is_stable_within_groups() {
        // eoq ~= 158.1 for every product
        let catalog = vec![
            product(1, 20.0, 150),  // Good
            product(2, 20.0, 10),   // Understocked
            product(3, 20.0, 5000), // Overstocked
            product(4, 20.0, 20),   // Understocked
            product(5, 20.0, 300),  // Good
        ];
        let ids: Vec<i64> = eoq_analysis(&catalog, &EoqPolicy::default())
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 4, 3, 1, 5]);
    }

    #[test]
    fn record_serializes_status_name() {
        let records = eoq_analysis(&[product(9, 20.0, 10)], &EoqPolicy::default());
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["status"], "Understocked");
        assert_eq!(json["current_stock"], 10);
    }
}
