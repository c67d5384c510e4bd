//! Review Model

use super::serde_helpers;
use serde::Deserialize;
use shared::models::Review;

/// Review projection with the author's and product's names resolved
pub const REVIEW_FIELDS: &str = "record::id(id) AS id, record::id(customer) AS customer_id, \
     customer.name AS customer_name, record::id(product) AS product_id, \
     product.name AS product_name, comment, timestamp";

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRow {
    pub id: String,
    pub customer_id: String,
    #[serde(default, deserialize_with = "serde_helpers::string_or_empty")]
    pub customer_name: String,
    pub product_id: String,
    #[serde(default, deserialize_with = "serde_helpers::string_or_empty")]
    pub product_name: String,
    pub comment: String,
    pub timestamp: i64,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            product_id: row.product_id,
            product_name: row.product_name,
            comment: row.comment,
            timestamp: row.timestamp,
        }
    }
}
