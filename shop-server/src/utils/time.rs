//! Time helpers
//!
//! Everything stored in the database is Unix millis (`i64`).

use chrono::{NaiveDate, Utc};

use super::{AppError, AppResult};

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse an ISO date (`YYYY-MM-DD`)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Parse a date of birth; it may not lie in the future
pub fn parse_birth_date(date: &str) -> AppResult<NaiveDate> {
    let parsed = parse_date(date)?;
    let today = Utc::now().date_naive();
    if parsed > today {
        return Err(AppError::validation(format!(
            "Date of birth {} is in the future",
            parsed
        )));
    }
    Ok(parsed)
}
