use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order statuses produced by the order simulator.
///
/// Stored orders carry free-form status strings; this enum only names the
/// ones the engine itself emits.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// Whether goods for an order in this status have reached the warehouse.
    pub fn adds_stock(&self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Delivered)
    }
}

/// A historical purchase order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
pub struct Order {
    #[serde(default)]
    pub id: i64,
    pub product_id: i64,
    pub supplier_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i64,
    pub order_date: DateTime<Utc>,
    pub status: String,
}

impl Order {
    pub fn order_day(&self) -> NaiveDate {
        self.order_date.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn shipped_and_delivered_add_stock() {
        assert!(!OrderStatus::Pending.adds_stock());
        assert!(OrderStatus::Shipped.adds_stock());
        assert!(OrderStatus::Delivered.adds_stock());
    }

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(OrderStatus::Shipped.to_string(), "Shipped");
        assert_eq!(OrderStatus::from_str("Delivered").unwrap(), OrderStatus::Delivered);
    }

    #[test]
    fn zero_quantity_fails_validation() {
        let order = Order {
            id: 1,
            product_id: 1,
            supplier_id: 1,
            quantity: 0,
            order_date: Utc::now(),
            status: "Pending".to_string(),
        };
        assert!(order.validate().is_err());
    }
}
