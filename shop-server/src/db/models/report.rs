//! Report Model

use super::serde_helpers;
use serde::Deserialize;
use shared::models::Report;

pub const REPORT_FIELDS: &str = "record::id(id) AS id, record::id(customer) AS customer_id, \
     customer.name AS customer_name, text, timestamp, is_seen";

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRow {
    pub id: String,
    pub customer_id: String,
    #[serde(default, deserialize_with = "serde_helpers::string_or_empty")]
    pub customer_name: String,
    pub text: String,
    pub timestamp: i64,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_seen: bool,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            text: row.text,
            timestamp: row.timestamp,
            is_seen: row.is_seen,
        }
    }
}
