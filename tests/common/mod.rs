//! Shared record fixtures for integration tests.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use scm_analytics::{Order, Product, Supplier};

pub fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap() + Duration::days(offset)
}

pub fn product(id: i64, price: f64, stock_level: i64) -> Product {
    Product {
        id,
        name: format!("Product {}", id),
        price,
        stock_level,
        reorder_point: 20,
        supplier_id: 1,
        annual_demand: None,
        category: Some("General".into()),
    }
}

pub fn supplier(id: i64, score: Option<f64>) -> Supplier {
    Supplier {
        id,
        name: format!("Supplier {}", id),
        reliability_score: score,
    }
}

pub fn order(id: i64, product_id: i64, quantity: i64, offset: i64) -> Order {
    Order {
        id,
        product_id,
        supplier_id: 1,
        quantity,
        order_date: day(offset),
        status: "Delivered".into(),
    }
}

/// Order history where `quantity = 2 * day_index + 10` for product 1.
pub fn linear_history(days: i64) -> Vec<Order> {
    (0..days).map(|d| order(d + 1, 1, 2 * d + 10, d)).collect()
}

/// A small catalog spanning every EOQ status and ABC class.
pub fn catalog() -> Vec<Product> {
    vec![
        product(1, 20.0, 10),   // high value, understocked
        product(2, 2.0, 600),   // eoq 500, good
        product(3, 20.0, 5000), // overstocked
        product(4, 0.5, 40),
        product(5, 1.0, 15),
    ]
}

pub fn suppliers() -> Vec<Supplier> {
    vec![
        supplier(1, Some(4.6)),
        supplier(2, Some(4.2)),
        supplier(3, Some(3.0)),
        supplier(4, None),
        supplier(5, Some(1.2)),
        supplier(6, Some(0.8)),
    ]
}
