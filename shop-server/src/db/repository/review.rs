//! Review Repository

use super::{BaseRepository, RepoError, RepoResult, record};
use crate::db::models::ReviewRow;
use crate::db::models::review::REVIEW_FIELDS;
use crate::db::new_key;
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ReviewRow>> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT {REVIEW_FIELDS} FROM $id"))
            .bind(("id", record(TABLE, id)))
            .await?;
        let reviews: Vec<ReviewRow> = result.take(0)?;
        Ok(reviews.into_iter().next())
    }

    /// Reviews of a product, newest first
    pub async fn find_by_product(&self, product_id: &str) -> RepoResult<Vec<ReviewRow>> {
        let reviews: Vec<ReviewRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {REVIEW_FIELDS} FROM review WHERE product = $product ORDER BY timestamp DESC"
            ))
            .bind(("product", record("product", product_id)))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Reviews written by a customer, newest first
    pub async fn find_by_customer(&self, customer_id: &str) -> RepoResult<Vec<ReviewRow>> {
        let reviews: Vec<ReviewRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {REVIEW_FIELDS} FROM review WHERE customer = $customer ORDER BY timestamp DESC"
            ))
            .bind(("customer", record("customer", customer_id)))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    pub async fn create(
        &self,
        customer_id: &str,
        product_id: &str,
        comment: String,
    ) -> RepoResult<ReviewRow> {
        let key = new_key();
        self.base
            .db()
            .query(
                r#"CREATE $id SET
                    customer = $customer,
                    product = $product,
                    comment = $comment,
                    timestamp = $now
                RETURN NONE"#,
            )
            .bind(("id", record(TABLE, &key)))
            .bind(("customer", record("customer", customer_id)))
            .bind(("product", record("product", product_id)))
            .bind(("comment", comment))
            .bind(("now", now_millis()))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE $id")
            .bind(("id", record(TABLE, id)))
            .await?
            .check()?;
        Ok(())
    }
}
