use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

use crate::models::{Order, OrderStatus, Product, Supplier};

/// Largest quantity a simulated order asks for.
pub const MAX_SIMULATED_QUANTITY: i64 = 20;

/// A generated order plus its effect on the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedOrder {
    pub order: Order,
    pub product_name: String,
    /// The product's stock level after receiving this order, when the
    /// generated status means the goods have arrived.
    pub new_stock_level: Option<i64>,
}

/// Generates one random purchase order against the given catalog.
///
/// Returns `None` when there are no products or no suppliers to pick from.
/// The caller persists the order and applies `new_stock_level`.
#[instrument(skip_all, fields(products = products.len(), suppliers = suppliers.len()))]
pub fn simulate_order<R: Rng + ?Sized>(
    products: &[Product],
    suppliers: &[Supplier],
    orders: &[Order],
    rng: &mut R,
    now: DateTime<Utc>,
) -> Option<SimulatedOrder> {
    let product = products.choose(rng)?;
    let supplier = suppliers.choose(rng)?;
    let quantity = rng.gen_range(1..=MAX_SIMULATED_QUANTITY);
    let statuses: Vec<OrderStatus> = OrderStatus::iter().collect();
    let status = *statuses.choose(rng)?;

    let id = orders.iter().map(|o| o.id).max().map_or(1, |last| last + 1);
    let new_stock_level = status
        .adds_stock()
        .then(|| product.stock_level + quantity);

    debug!(id, product_id = product.id, quantity, %status, "Simulated order");
    Some(SimulatedOrder {
        order: Order {
            id,
            product_id: product.id,
            supplier_id: supplier.id,
            quantity,
            order_date: now,
            status: status.to_string(),
        },
        product_name: product.name.clone(),
        new_stock_level,
    })
}
