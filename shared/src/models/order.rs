//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// `Placed` is the only non-terminal state; it moves to either `Received`
/// or `Cancelled` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Received,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Placed, Self::Received) | (Self::Placed, Self::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested line of a new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: String,
    pub product_quantity: i64,
}

/// `POST /orders/make` body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub products: Vec<OrderLineRequest>,
}

/// Body carrying a single id (`/orders/received`, `/admin/getorders`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlaced {
    pub order_id: String,
    pub cost: f64,
}

/// Line item with the price snapshot taken at placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub cost: f64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub products: Vec<OrderLine>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total_orders: u64,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Received));
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Placed));
        assert!(!OrderStatus::Received.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Received));
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        let status: OrderStatus = serde_json::from_str("\"received\"").unwrap();
        assert_eq!(status, OrderStatus::Received);
    }

    #[test]
    fn test_missing_products_defaults_to_empty() {
        let req: PlaceOrderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.products.is_empty());
    }
}
