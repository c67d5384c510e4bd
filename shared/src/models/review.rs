//! Review Model

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub product_id: String,
    pub product_name: String,
    pub comment: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddReviewRequest {
    #[validate(length(min = 1, max = 500, message = "Comment must not be empty"))]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    pub total_reviews: u64,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreated {
    pub review: Review,
}
