//! Product Repository
//!
//! Stock columns (`available_quantity`, `reserved_quantity`) are only moved
//! through the conditional updates below; the inventory ledger serializes
//! them per product.

use super::{BaseRepository, CountRow, RepoError, RepoResult, count_of, record};
use crate::db::models::product::PRODUCT_FIELDS;
use crate::db::models::{ProductRow, StockRow};
use crate::db::new_key;
use crate::utils::time::now_millis;
use shared::models::{ProductCreate, ProductUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<ProductRow>> {
        let products: Vec<ProductRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {PRODUCT_FIELDS} FROM product ORDER BY created_at DESC"
            ))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ProductRow>> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT {PRODUCT_FIELDS} FROM $id"))
            .bind(("id", record(TABLE, id)))
            .await?;
        let products: Vec<ProductRow> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Find product by its unique name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<ProductRow>> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT {PRODUCT_FIELDS} FROM product WHERE name = $name LIMIT 1"
            ))
            .bind(("name", name.to_string()))
            .await?;
        let products: Vec<ProductRow> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Create a new product with all stock available
    pub async fn create(&self, data: ProductCreate) -> RepoResult<ProductRow> {
        let key = new_key();
        let now = now_millis();

        self.base
            .db()
            .query(
                r#"CREATE $id SET
                    name = $name,
                    price = $price,
                    available_quantity = $quantity,
                    reserved_quantity = 0,
                    image_url = $image_url,
                    created_at = $now,
                    updated_at = $now
                RETURN NONE"#,
            )
            .bind(("id", record(TABLE, &key)))
            .bind(("name", data.name))
            .bind(("price", data.price))
            .bind(("quantity", data.quantity))
            .bind(("image_url", data.image_url))
            .bind(("now", now))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update catalogue fields; `quantity` replaces the available stock
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<ProductRow> {
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }

        self.base
            .db()
            .query(
                r#"UPDATE $id SET
                    name = $name OR name,
                    price = IF $has_price THEN $price ELSE price END,
                    available_quantity = IF $has_quantity THEN $quantity ELSE available_quantity END,
                    image_url = IF $has_image THEN $image_url ELSE image_url END,
                    updated_at = $now
                RETURN NONE"#,
            )
            .bind(("id", record(TABLE, id)))
            .bind(("name", data.name))
            .bind(("has_price", data.price.is_some()))
            .bind(("price", data.price))
            .bind(("has_quantity", data.quantity.is_some()))
            .bind(("quantity", data.quantity))
            .bind(("has_image", data.image_url.is_some()))
            .bind(("image_url", data.image_url))
            .bind(("now", now_millis()))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Move `quantity` from available to reserved if enough is available
    ///
    /// Returns `None` when the product is missing or the guard failed.
    pub async fn reserve(&self, id: &str, quantity: i64) -> RepoResult<Option<StockRow>> {
        self.stock_update(
            id,
            quantity,
            r#"UPDATE $id SET
                available_quantity -= $qty,
                reserved_quantity += $qty,
                updated_at = $now
            WHERE available_quantity >= $qty
            RETURN AFTER"#,
        )
        .await
    }

    /// Move `quantity` from reserved back to available
    pub async fn release(&self, id: &str, quantity: i64) -> RepoResult<Option<StockRow>> {
        self.stock_update(
            id,
            quantity,
            r#"UPDATE $id SET
                reserved_quantity -= $qty,
                available_quantity += $qty,
                updated_at = $now
            WHERE reserved_quantity >= $qty
            RETURN AFTER"#,
        )
        .await
    }

    /// Drop `quantity` from reserved (goods left the shop)
    pub async fn finalize(&self, id: &str, quantity: i64) -> RepoResult<Option<StockRow>> {
        self.stock_update(
            id,
            quantity,
            r#"UPDATE $id SET
                reserved_quantity -= $qty,
                updated_at = $now
            WHERE reserved_quantity >= $qty
            RETURN AFTER"#,
        )
        .await
    }

    async fn stock_update(
        &self,
        id: &str,
        quantity: i64,
        statement: &'static str,
    ) -> RepoResult<Option<StockRow>> {
        let mut result = self
            .base
            .db()
            .query(statement)
            .bind(("id", record(TABLE, id)))
            .bind(("qty", quantity))
            .bind(("now", now_millis()))
            .await?;
        let rows: Vec<StockRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Count line items of `placed` orders that reference the product
    pub async fn count_open_lines(&self, id: &str) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT count() AS total FROM order_line
                WHERE product_id = $product AND order_id.status = 'placed'
                GROUP ALL"#,
            )
            .bind(("product", record(TABLE, id)))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(count_of(rows))
    }

    /// Delete the product (and its reviews) if nothing is reserved
    ///
    /// Returns `false` when the product is missing or still holds reservations.
    pub async fn delete_if_unreserved(&self, id: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("DELETE $id WHERE reserved_quantity = 0 RETURN BEFORE")
            .bind(("id", record(TABLE, id)))
            .await?;
        let deleted: Vec<StockRow> = result.take(0)?;
        if deleted.is_empty() {
            return Ok(false);
        }

        self.base
            .db()
            .query("DELETE review WHERE product = $product")
            .bind(("product", record(TABLE, id)))
            .await?
            .check()?;
        Ok(true)
    }
}
