use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::AnalyticsConfig;
use crate::errors::ServiceError;
use crate::ml::GaussianNoise;
use crate::models::{index_by_id, Order, Product, Supplier};
use crate::services::abc_analysis::{abc_analysis, AbcRecord};
use crate::services::eoq::{eoq_analysis, EoqPolicy, EoqRecord};
use crate::services::file_analysis::{analyze_file_with, FileAnalysisOutcome};
use crate::services::forecasting::{forecast_demand, ForecastResult};
use crate::services::suppliers::{classify_suppliers, FeatureNoise, SupplierClassification};

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Sum of `quantity * price` over orders of known products, truncated
    pub total_revenue: i64,
    pub total_products: usize,
    /// Products at or below their reorder point
    pub low_stock_alerts: usize,
    pub active_suppliers: usize,
}

/// Aggregates catalog and order history into [`DashboardStats`].
///
/// Orders referencing a product that is not in `products` add no revenue.
#[instrument(skip_all)]
pub fn dashboard_stats(
    products: &[Product],
    orders: &[Order],
    suppliers: &[Supplier],
) -> DashboardStats {
    let by_id = index_by_id(products, |p| p.id);
    let revenue: f64 = orders
        .iter()
        .filter_map(|o| by_id.get(&o.product_id).map(|p| o.quantity as f64 * p.price))
        .sum();

    DashboardStats {
        total_revenue: revenue.trunc() as i64,
        total_products: products.len(),
        low_stock_alerts: products.iter().filter(|p| p.is_low_stock()).count(),
        active_suppliers: suppliers.len(),
    }
}

/// Analytics engine configured once and shared by callers.
///
/// Every operation takes the records it works on as arguments; the service
/// holds configuration only.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    config: AnalyticsConfig,
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

impl AnalyticsService {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn eoq_policy(&self) -> EoqPolicy {
        EoqPolicy {
            ordering_cost: self.config.ordering_cost,
            holding_cost_rate: self.config.holding_cost_rate,
            default_annual_demand: self.config.default_annual_demand,
        }
    }

    pub fn feature_noise(&self) -> FeatureNoise {
        FeatureNoise {
            delivery_std: self.config.delivery_noise_std,
            defect_std: self.config.defect_noise_std,
        }
    }

    /// Forecast over the configured horizon.
    pub fn forecast(&self, product_id: i64, orders: &[Order]) -> Result<ForecastResult, ServiceError> {
        self.forecast_with_horizon(product_id, self.config.forecast_horizon, orders)
    }

    pub fn forecast_with_horizon(
        &self,
        product_id: i64,
        horizon: u32,
        orders: &[Order],
    ) -> Result<ForecastResult, ServiceError> {
        forecast_demand(product_id, horizon, orders)
    }

    pub fn abc(&self, products: &[Product]) -> Vec<AbcRecord> {
        abc_analysis(products)
    }

    pub fn eoq(&self, products: &[Product]) -> Vec<EoqRecord> {
        eoq_analysis(products, &self.eoq_policy())
    }

    /// Classifies suppliers with noise seeded from `noise_seed`, or from
    /// entropy when no seed is configured.
    pub fn classify_suppliers(&self, suppliers: &[Supplier]) -> Vec<SupplierClassification> {
        let mut noise = GaussianNoise::from_seed_option(self.config.noise_seed);
        classify_suppliers(suppliers, &self.feature_noise(), &mut noise)
    }

    pub fn analyze_file(&self, bytes: &[u8], filename: &str) -> FileAnalysisOutcome {
        analyze_file_with(bytes, filename, self.config.head_rows)
    }

    pub fn dashboard(
        &self,
        products: &[Product],
        orders: &[Order],
        suppliers: &[Supplier],
    ) -> DashboardStats {
        let stats = dashboard_stats(products, orders, suppliers);
        info!(
            total_revenue = stats.total_revenue,
            low_stock_alerts = stats.low_stock_alerts,
            "Computed dashboard stats"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn product(id: i64, price: f64, stock_level: i64, reorder_point: i64) -> Product {
        Product {
            id,
            name: format!("P{}", id),
            price,
            stock_level,
            reorder_point,
            supplier_id: 1,
            annual_demand: None,
            category: None,
        }
    }

    fn order(product_id: i64, quantity: i64) -> Order {
        Order {
            id: 0,
            product_id,
            supplier_id: 1,
            quantity,
            order_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            status: "Delivered".into(),
        }
    }

    #[test]
    fn dashboard_revenue_skips_unknown_products_and_truncates() {
        let products = [product(1, 2.75, 5, 10), product(2, 1.0, 50, 10)];
        let orders = [order(1, 3), order(2, 1), order(99, 1000)];
        let stats = dashboard_stats(&products, &orders, &[]);
        // 3 * 2.75 + 1 = 9.25
        assert_eq!(stats.total_revenue, 9);
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.low_stock_alerts, 1);
        assert_eq!(stats.active_suppliers, 0);
    }

    #[test]
    fn reorder_point_itself_is_low_stock() {
        let stats = dashboard_stats(&[product(1, 1.0, 10, 10)], &[], &[]);
        assert_eq!(stats.low_stock_alerts, 1);
    }

    #[test]
    fn eoq_policy_follows_config() {
        let config = AnalyticsConfig {
            ordering_cost: 100.0,
            ..AnalyticsConfig::default()
        };
        let service = AnalyticsService::new(config);
        assert_eq!(service.eoq_policy().ordering_cost, 100.0);
        assert_eq!(service.eoq_policy().holding_cost_rate, 0.2);
    }

    #[test]
    fn seeded_service_classifies_reproducibly() {
        let config = AnalyticsConfig {
            noise_seed: Some(11),
            ..AnalyticsConfig::default()
        };
        let service = AnalyticsService::new(config);
        let suppliers: Vec<Supplier> = (1..=6)
            .map(|id| Supplier {
                id,
                name: format!("S{}", id),
                reliability_score: Some(id as f64 * 0.8),
            })
            .collect();
        assert_eq!(
            service.classify_suppliers(&suppliers),
            service.classify_suppliers(&suppliers)
        );
    }

    #[test]
    fn forecast_uses_configured_horizon() {
        let service = AnalyticsService::default();
        let orders = [
            Order {
                order_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                ..order(1, 10)
            },
            Order {
                order_date: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                ..order(1, 12)
            },
        ];
        let forecast = service.forecast(1, &orders).unwrap();
        assert_eq!(forecast.len(), 3);
    }
}
