use serde::{Deserialize, Serialize};
use validator::Validate;

/// Annual demand assumed for products that carry no demand figure.
pub const DEFAULT_ANNUAL_DEMAND: i64 = 1000;

/// A catalog product as fetched by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    /// Unique identifier for the product.
    pub id: i64,
    pub name: String,
    /// Unit price, never negative.
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Units currently on hand.
    #[validate(range(min = 0))]
    pub stock_level: i64,
    /// Stock level at or below which the product needs replenishment.
    pub reorder_point: i64,
    pub supplier_id: i64,
    /// Yearly unit demand; `None` falls back to [`DEFAULT_ANNUAL_DEMAND`].
    #[serde(default)]
    pub annual_demand: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// Inventory value tied up in current stock.
    pub fn stock_value(&self) -> f64 {
        self.price * self.stock_level as f64
    }

    pub fn annual_demand_or(&self, default: i64) -> i64 {
        self.annual_demand.unwrap_or(default)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_level <= self.reorder_point
    }
}
