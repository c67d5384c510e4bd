//! Order status transitions

use shared::models::OrderStatus;

use super::OrderError;

/// Check that an order in `current` may move to `next`
///
/// The only legal moves are `placed → received` and `placed → cancelled`;
/// the error names the terminal state the order is already in.
pub fn ensure_transition(
    order_id: &str,
    current: OrderStatus,
    next: OrderStatus,
) -> Result<(), OrderError> {
    if current.can_transition_to(next) {
        return Ok(());
    }
    Err(terminal_error(order_id, current))
}

/// Error for an order that already left `placed`
pub fn terminal_error(order_id: &str, current: OrderStatus) -> OrderError {
    match current {
        OrderStatus::Cancelled => OrderError::AlreadyCancelled(order_id.to_string()),
        OrderStatus::Received => OrderError::AlreadyReceived(order_id.to_string()),
        // A placed order only fails to transition when the claim was lost
        OrderStatus::Placed => OrderError::Conflict(order_id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_placed_moves() {
        assert!(ensure_transition("o1", OrderStatus::Placed, OrderStatus::Received).is_ok());
        assert!(ensure_transition("o1", OrderStatus::Placed, OrderStatus::Cancelled).is_ok());
        assert!(matches!(
            ensure_transition("o1", OrderStatus::Cancelled, OrderStatus::Cancelled),
            Err(OrderError::AlreadyCancelled(_))
        ));
        assert!(matches!(
            ensure_transition("o1", OrderStatus::Received, OrderStatus::Cancelled),
            Err(OrderError::AlreadyReceived(_))
        ));
        assert!(matches!(
            ensure_transition("o1", OrderStatus::Cancelled, OrderStatus::Received),
            Err(OrderError::AlreadyCancelled(_))
        ));
    }
}
