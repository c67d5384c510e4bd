//! Order Model

use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderLine, OrderStatus};

pub const ORDER_FIELDS: &str = "record::id(id) AS id, record::id(customer) AS customer_id, \
     cost, status, line_count, created_at, updated_at";

pub const ORDER_LINE_FIELDS: &str = "record::id(order_id) AS order_id, \
     record::id(product_id) AS product_id, product_name, unit_price, quantity, position";

/// Order header row (`order` table)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRow {
    pub id: String,
    pub customer_id: String,
    pub cost: f64,
    pub status: OrderStatus,
    /// Number of `order_line` rows written with the order
    pub line_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl OrderRow {
    /// Attach line items to build the API shape
    pub fn into_order(self, lines: Vec<OrderLineRow>) -> Order {
        Order {
            id: self.id,
            customer_id: self.customer_id,
            cost: self.cost,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            products: lines.into_iter().map(OrderLine::from).collect(),
        }
    }
}

/// Status column returned by a claimed transition
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusRow {
    pub status: OrderStatus,
}

/// Line item row (`order_line` join table)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineRow {
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub position: i64,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            product_id: row.product_id,
            product_name: row.product_name,
            unit_price: row.unit_price,
            quantity: row.quantity,
        }
    }
}

/// Line item written inside the placement transaction
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineInsert {
    pub product_key: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub position: i64,
}
