//! Report Model

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub text: String,
    pub timestamp: i64,
    pub is_seen: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddReportRequest {
    #[validate(length(min = 1, max = 2000, message = "Report text must not be empty"))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPage {
    pub reports: Vec<Report>,
    pub total_reports: u64,
    pub current_page: u32,
    pub total_pages: u32,
}
