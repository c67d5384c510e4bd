//! Product Model

use serde::{Deserialize, Serialize};

/// Product as exposed by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// Units that can still be ordered
    pub available_quantity: i64,
    /// Units held by placed orders
    pub reserved_quantity: i64,
    pub has_open_orders: bool,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload (assembled from the multipart form)
#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub image_url: Option<String>,
}

/// Update product payload; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    /// New available quantity (restock)
    pub quantity: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetails {
    pub product: Product,
}
