use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::models::{index_by_id, Order, Product, Supplier};
use crate::reports::ReportTable;

pub const ORDERS_REPORT_TITLE: &str = "Orders Report";
pub const INVENTORY_REPORT_TITLE: &str = "Inventory Report";

const ORDER_HEADERS: [&str; 6] = ["Order ID", "Product", "Quantity", "Date", "Status", "Supplier"];
const INVENTORY_HEADERS: [&str; 7] = [
    "ID",
    "Name",
    "Category",
    "Price",
    "Stock",
    "Reorder Point",
    "Supplier",
];

/// Placeholder for a name that cannot be resolved.
const UNKNOWN: &str = "N/A";

fn name_or_unknown(name: Option<&str>) -> Value {
    Value::String(name.unwrap_or(UNKNOWN).to_string())
}

/// One row per order, with product and supplier names resolved by id.
#[instrument(skip_all, fields(order_count = orders.len()))]
pub fn orders_report(orders: &[Order], products: &[Product], suppliers: &[Supplier]) -> ReportTable {
    let products = index_by_id(products, |p| p.id);
    let suppliers = index_by_id(suppliers, |s| s.id);

    let mut table = ReportTable::new(ORDERS_REPORT_TITLE, "orders", &ORDER_HEADERS);
    for order in orders {
        table.push_row(vec![
            json!(order.id),
            name_or_unknown(products.get(&order.product_id).map(|p| p.name.as_str())),
            json!(order.quantity),
            json!(order.order_day().format("%Y-%m-%d").to_string()),
            json!(order.status),
            name_or_unknown(suppliers.get(&order.supplier_id).map(|s| s.name.as_str())),
        ]);
    }

    info!(rows = table.len(), "Built orders report");
    table
}

/// One row per product. A product without a category reports `null`.
#[instrument(skip_all, fields(product_count = products.len()))]
pub fn inventory_report(products: &[Product], suppliers: &[Supplier]) -> ReportTable {
    let suppliers = index_by_id(suppliers, |s| s.id);

    let mut table = ReportTable::new(INVENTORY_REPORT_TITLE, "inventory", &INVENTORY_HEADERS);
    for product in products {
        table.push_row(vec![
            json!(product.id),
            json!(product.name),
            json!(product.category),
            json!(product.price),
            json!(product.stock_level),
            json!(product.reorder_point),
            name_or_unknown(suppliers.get(&product.supplier_id).map(|s| s.name.as_str())),
        ]);
    }

    info!(rows = table.len(), "Built inventory report");
    table
}
