//! Report Repository

use super::{BaseRepository, RepoError, RepoResult, record};
use crate::db::models::ReportRow;
use crate::db::models::report::REPORT_FIELDS;
use crate::db::new_key;
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "report";

#[derive(Clone)]
pub struct ReportRepository {
    base: BaseRepository,
}

impl ReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ReportRow>> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT {REPORT_FIELDS} FROM $id"))
            .bind(("id", record(TABLE, id)))
            .await?;
        let reports: Vec<ReportRow> = result.take(0)?;
        Ok(reports.into_iter().next())
    }

    /// All reports, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<ReportRow>> {
        let reports: Vec<ReportRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {REPORT_FIELDS} FROM report ORDER BY timestamp DESC"
            ))
            .await?
            .take(0)?;
        Ok(reports)
    }

    pub async fn create(&self, customer_id: &str, text: String) -> RepoResult<ReportRow> {
        let key = new_key();
        self.base
            .db()
            .query(
                r#"CREATE $id SET
                    customer = $customer,
                    text = $text,
                    timestamp = $now,
                    is_seen = false
                RETURN NONE"#,
            )
            .bind(("id", record(TABLE, &key)))
            .bind(("customer", record("customer", customer_id)))
            .bind(("text", text))
            .bind(("now", now_millis()))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create report".to_string()))
    }

    /// Flag a report as seen
    pub async fn mark_seen(&self, id: &str) -> RepoResult<ReportRow> {
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Report {} not found", id)));
        }
        self.base
            .db()
            .query("UPDATE $id SET is_seen = true RETURN NONE")
            .bind(("id", record(TABLE, id)))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Report {} not found", id)))
    }

    /// Returns `false` when the report does not exist
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        if self.find_by_id(id).await?.is_none() {
            return Ok(false);
        }
        self.base
            .db()
            .query("DELETE $id")
            .bind(("id", record(TABLE, id)))
            .await?
            .check()?;
        Ok(true)
    }
}
