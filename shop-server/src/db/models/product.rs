//! Product Model

use serde::Deserialize;
use shared::models::Product;

/// Projection shared by every product read
pub const PRODUCT_FIELDS: &str = "record::id(id) AS id, name, price, available_quantity, \
     reserved_quantity, image_url, created_at, updated_at";

/// Product row as stored in the `product` table
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub available_quantity: i64,
    pub reserved_quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            has_open_orders: row.reserved_quantity > 0,
            id: row.id,
            name: row.name,
            price: row.price,
            available_quantity: row.available_quantity,
            reserved_quantity: row.reserved_quantity,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Stock columns returned by the ledger's conditional updates
#[derive(Debug, Clone, Deserialize)]
pub struct StockRow {
    pub name: String,
    pub price: f64,
    pub available_quantity: i64,
    pub reserved_quantity: i64,
}
