//! Order service
//!
//! Placement reserves stock line by line, then persists the order and its
//! lines in one transaction. Cancel and receive claim the status change on
//! the order first and only then settle the ledger, so a line is never
//! released or finalized twice.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::models::{Order, OrderLineRequest, OrderPage, OrderPlaced, OrderStatus};

use super::money::{line_total, to_f64};
use super::status::{ensure_transition, terminal_error};
use super::OrderError;
use crate::auth::Caller;
use crate::core::config::OrderConfig;
use crate::db::models::{OrderLineInsert, OrderLineRow, OrderRow};
use crate::db::repository::{CustomerRepository, OrderRepository, paginate};
use crate::inventory::{InventoryLedger, RecordLocks, Reservation};

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    customers: CustomerRepository,
    ledger: InventoryLedger,
    config: OrderConfig,
    /// Serializes status claims per order id
    transitions: RecordLocks,
    /// Serializes placement against account deletion per customer id
    accounts: RecordLocks,
}

impl OrderService {
    pub fn new(
        orders: OrderRepository,
        customers: CustomerRepository,
        ledger: InventoryLedger,
        config: OrderConfig,
    ) -> Self {
        Self {
            orders,
            customers,
            ledger,
            config,
            transitions: RecordLocks::new(),
            accounts: RecordLocks::new(),
        }
    }

    /// Place an order for `customer_id`
    pub async fn place_order(
        &self,
        customer_id: &str,
        lines: &[OrderLineRequest],
    ) -> Result<OrderPlaced, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        let _account = self.accounts.lock(customer_id).await;
        if self.customers.find_by_id(customer_id).await?.is_none() {
            return Err(OrderError::UnknownCustomer(customer_id.to_string()));
        }

        let mut reservations: Vec<Reservation> = Vec::with_capacity(lines.len());
        let mut cost = Decimal::ZERO;

        for (index, line) in lines.iter().enumerate() {
            match self
                .ledger
                .reserve(&line.product_id, line.product_quantity)
                .await
            {
                Ok(reservation) => {
                    cost += line_total(reservation.unit_price, reservation.quantity);
                    reservations.push(reservation);
                }
                Err(source) => {
                    tracing::warn!(
                        customer_id = %customer_id,
                        line = index,
                        product_id = %line.product_id,
                        error = %source,
                        "Order line could not be reserved"
                    );
                    if self.config.rollback_partial_reservations {
                        self.release_all(&reservations).await;
                    } else if !reservations.is_empty() {
                        let orphaned: Vec<&str> = reservations
                            .iter()
                            .map(|r| r.product_id.as_str())
                            .collect();
                        tracing::warn!(
                            customer_id = %customer_id,
                            orphaned = ?orphaned,
                            "Partial reservations kept without an order"
                        );
                    }
                    return Err(OrderError::Line { index, source });
                }
            }
        }

        let cost = to_f64(cost);
        let inserts: Vec<OrderLineInsert> = reservations
            .iter()
            .enumerate()
            .map(|(position, r)| OrderLineInsert {
                product_key: r.product_id.clone(),
                product_name: r.product_name.clone(),
                unit_price: r.unit_price,
                quantity: r.quantity,
                position: position as i64,
            })
            .collect();

        match self
            .orders
            .create_with_lines(customer_id, cost, inserts)
            .await
        {
            Ok(order_id) => {
                tracing::info!(
                    order_id = %order_id,
                    customer_id = %customer_id,
                    lines = reservations.len(),
                    cost,
                    "Order placed"
                );
                Ok(OrderPlaced { order_id, cost })
            }
            Err(e) => {
                // No order references these reservations
                tracing::error!(customer_id = %customer_id, error = %e, "Failed to persist order");
                self.release_all(&reservations).await;
                Err(e.into())
            }
        }
    }

    /// Cancel a placed order and return its stock
    ///
    /// Allowed for the owning customer and for the admin.
    pub async fn cancel(&self, order_id: &str, caller: &Caller) -> Result<(), OrderError> {
        let order = self.require(order_id).await?;
        if !caller.is_admin() && order.customer_id != caller.id() {
            return Err(OrderError::NotOwner(order_id.to_string()));
        }

        let lines = self.transition(&order, OrderStatus::Cancelled).await?;

        let mut failed = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            if let Err(e) = self.ledger.release(&line.product_id, line.quantity).await {
                tracing::error!(
                    order_id = %order_id,
                    line = index,
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    error = %e,
                    "Failed to release stock for cancelled order"
                );
                failed.push(index);
            }
        }
        settle_result(order_id, failed)?;

        tracing::info!(order_id = %order_id, by_admin = caller.is_admin(), "Order cancelled");
        Ok(())
    }

    /// Mark a placed order as received; its reserved stock leaves the shop
    pub async fn mark_received(&self, order_id: &str) -> Result<(), OrderError> {
        let order = self.require(order_id).await?;
        let lines = self.transition(&order, OrderStatus::Received).await?;

        let mut failed = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            if let Err(e) = self.ledger.finalize(&line.product_id, line.quantity).await {
                tracing::error!(
                    order_id = %order_id,
                    line = index,
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    error = %e,
                    "Failed to finalize stock for received order"
                );
                failed.push(index);
            }
        }
        settle_result(order_id, failed)?;

        tracing::info!(order_id = %order_id, "Order received");
        Ok(())
    }

    /// One page of a customer's orders, newest first
    pub async fn list_for_customer(
        &self,
        customer_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<OrderPage, OrderError> {
        let rows = self.orders.find_by_customer(customer_id).await?;
        let (rows, pagination) = paginate(rows, page, per_page);
        let orders = self.with_lines(rows).await?;

        Ok(OrderPage {
            orders,
            total_orders: pagination.total,
            current_page: pagination.page,
            total_pages: pagination.total_pages,
        })
    }

    /// Every order of a customer, newest first
    pub async fn list_all_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderError> {
        let rows = self.orders.find_by_customer(customer_id).await?;
        self.with_lines(rows).await
    }

    /// Order with its lines
    pub async fn get(&self, order_id: &str) -> Result<Order, OrderError> {
        let order = self.require(order_id).await?;
        let lines = self.orders.lines_for(order_id).await?;
        Ok(order.into_order(lines))
    }

    /// Delete a customer account with its reviews and reports
    ///
    /// Refused while the customer has `placed` orders. Holds the same
    /// per-customer lock as placement, so no order lands on a deleted account.
    pub async fn delete_customer(&self, customer_id: &str) -> Result<(), OrderError> {
        let _account = self.accounts.lock(customer_id).await;
        if !self.customers.delete_cascade(customer_id).await? {
            return Err(OrderError::CustomerHasOpenOrders(customer_id.to_string()));
        }
        tracing::info!(customer_id = %customer_id, "Customer account deleted");
        Ok(())
    }

    async fn require(&self, order_id: &str) -> Result<OrderRow, OrderError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    /// Validate, load the lines and claim `placed → next`
    async fn transition(
        &self,
        order: &OrderRow,
        next: OrderStatus,
    ) -> Result<Vec<OrderLineRow>, OrderError> {
        ensure_transition(&order.id, order.status, next)?;

        let lines = self.orders.lines_for(&order.id).await?;
        if lines.len() as i64 != order.line_count {
            tracing::error!(
                order_id = %order.id,
                expected = order.line_count,
                found = lines.len(),
                "Order lines do not match the order header"
            );
            return Err(OrderError::LinesInconsistent {
                order_id: order.id.clone(),
                expected: order.line_count,
                found: lines.len(),
            });
        }

        let claimed = {
            let _guard = self.transitions.lock(&order.id).await;
            self.orders.claim_transition(&order.id, next).await?
        };
        if !claimed {
            // Lost a race: report the state the winner left behind
            let current = self.require(&order.id).await?;
            return Err(terminal_error(&order.id, current.status));
        }

        Ok(lines)
    }

    async fn with_lines(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, OrderError> {
        let ids: Vec<String> = rows.iter().map(|o| o.id.clone()).collect();
        let mut by_order: HashMap<String, Vec<OrderLineRow>> = HashMap::new();
        for line in self.orders.lines_for_many(&ids).await? {
            by_order.entry(line.order_id.clone()).or_default().push(line);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut lines = by_order.remove(&row.id).unwrap_or_default();
                lines.sort_by_key(|l| l.position);
                row.into_order(lines)
            })
            .collect())
    }

    async fn release_all(&self, reservations: &[Reservation]) {
        for r in reservations {
            if let Err(e) = self.ledger.release(&r.product_id, r.quantity).await {
                tracing::error!(
                    product_id = %r.product_id,
                    quantity = r.quantity,
                    error = %e,
                    "Failed to roll back reservation"
                );
            }
        }
    }
}

fn settle_result(order_id: &str, failed_lines: Vec<usize>) -> Result<(), OrderError> {
    if failed_lines.is_empty() {
        return Ok(());
    }
    Err(OrderError::SettlementIncomplete {
        order_id: order_id.to_string(),
        failed_lines,
    })
}
