//! Order Repository
//!
//! An order header and its `order_line` rows are written in one transaction.
//! Status transitions are claimed with a conditional update on the header.

use super::{BaseRepository, RepoResult, record};
use crate::db::models::order::{ORDER_FIELDS, ORDER_LINE_FIELDS};
use crate::db::models::{OrderLineInsert, OrderLineRow, OrderRow, OrderStatusRow};
use crate::db::new_key;
use crate::utils::time::now_millis;
use shared::models::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a `placed` order with its line items atomically
    ///
    /// Returns the new order id.
    pub async fn create_with_lines(
        &self,
        customer_id: &str,
        cost: f64,
        lines: Vec<OrderLineInsert>,
    ) -> RepoResult<String> {
        let key = new_key();
        let now = now_millis();
        let line_count = lines.len() as i64;

        self.base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                CREATE $order SET
                    customer = $customer,
                    cost = $cost,
                    status = 'placed',
                    line_count = $line_count,
                    created_at = $now,
                    updated_at = $now
                RETURN NONE;
                FOR $line IN $lines {
                    CREATE order_line SET
                        order_id = $order,
                        product_id = type::thing('product', $line.product_key),
                        product_name = $line.product_name,
                        unit_price = $line.unit_price,
                        quantity = $line.quantity,
                        position = $line.position
                    RETURN NONE;
                };
                COMMIT TRANSACTION;"#,
            )
            .bind(("order", record(TABLE, &key)))
            .bind(("customer", record("customer", customer_id)))
            .bind(("cost", cost))
            .bind(("line_count", line_count))
            .bind(("lines", lines))
            .bind(("now", now))
            .await?
            .check()?;

        Ok(key)
    }

    /// Find order header by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<OrderRow>> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT {ORDER_FIELDS} FROM $id"))
            .bind(("id", record(TABLE, id)))
            .await?;
        let orders: Vec<OrderRow> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Orders of a customer, newest first
    pub async fn find_by_customer(&self, customer_id: &str) -> RepoResult<Vec<OrderRow>> {
        let orders: Vec<OrderRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {ORDER_FIELDS} FROM order WHERE customer = $customer ORDER BY created_at DESC"
            ))
            .bind(("customer", record("customer", customer_id)))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Line items of one order in placement order
    pub async fn lines_for(&self, order_id: &str) -> RepoResult<Vec<OrderLineRow>> {
        let lines: Vec<OrderLineRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {ORDER_LINE_FIELDS} FROM order_line WHERE order_id = $order ORDER BY position"
            ))
            .bind(("order", record(TABLE, order_id)))
            .await?
            .take(0)?;
        Ok(lines)
    }

    /// Line items of several orders (one query for a page of history)
    pub async fn lines_for_many(&self, order_ids: &[String]) -> RepoResult<Vec<OrderLineRow>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<_> = order_ids.iter().map(|id| record(TABLE, id)).collect();
        let lines: Vec<OrderLineRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {ORDER_LINE_FIELDS} FROM order_line WHERE order_id IN $orders ORDER BY position"
            ))
            .bind(("orders", ids))
            .await?
            .take(0)?;
        Ok(lines)
    }

    /// Move a `placed` order to `to`
    ///
    /// Returns `false` when the order is missing or no longer `placed`, so
    /// exactly one of several racing transitions wins.
    pub async fn claim_transition(&self, id: &str, to: OrderStatus) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET status = $to, updated_at = $now
                WHERE status = 'placed'
                RETURN AFTER"#,
            )
            .bind(("id", record(TABLE, id)))
            .bind(("to", to.as_str()))
            .bind(("now", now_millis()))
            .await?;
        let claimed: Vec<OrderStatusRow> = result.take(0)?;
        Ok(claimed.iter().any(|row| row.status == to))
    }
}
