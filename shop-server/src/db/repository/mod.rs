//! Repository Module
//!
//! Provides CRUD operations for the SurrealDB tables.

// Catalogue
pub mod product;

// Accounts
pub mod customer;

// Orders
pub mod order;

// Feedback
pub mod report;
pub mod review;

// Re-exports
pub use customer::CustomerRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use report::ReportRepository;
pub use review::ReviewRepository;

use serde::Deserialize;
use shared::response::Pagination;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        // Unique index violations: "Database index `x` already contains ..."
        if message.contains("already contains") {
            RepoError::Duplicate(message)
        } else {
            RepoError::Database(message)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention
// =============================================================================
//
// The API exposes bare record keys ("3f2c..."); queries bind full record ids
// built with `record(table, key)`. Reads project keys back with
// `record::id(..)`, so rows never carry a `RecordId`.

/// Build a record id from a table name and a bare key
pub fn record(table: &str, key: &str) -> RecordId {
    RecordId::from_table_key(table, key.to_owned())
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// `SELECT count() AS total ... GROUP ALL` result row
#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub total: u64,
}

/// Total of a `GROUP ALL` count query (no rows means zero)
pub(crate) fn count_of(rows: Vec<CountRow>) -> u64 {
    rows.into_iter().next().map(|row| row.total).unwrap_or(0)
}

/// Slice one page out of rows already sorted by the query
///
/// Combining WHERE, ORDER BY and LIMIT/START in the embedded engine can drop
/// rows, so listings sort in the query and page here.
pub fn paginate<T>(rows: Vec<T>, page: u32, per_page: u32) -> (Vec<T>, Pagination) {
    let pagination = Pagination::new(page, per_page, rows.len() as u64);
    let items = rows
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(per_page as usize)
        .collect();
    (items, pagination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_slices_pages() {
        let rows: Vec<u32> = (1..=12).collect();

        let (first, meta) = paginate(rows.clone(), 1, 5);
        assert_eq!(first, vec![1, 2, 3, 4, 5]);
        assert_eq!(meta.total, 12);
        assert_eq!(meta.total_pages, 3);

        let (last, _) = paginate(rows.clone(), 3, 5);
        assert_eq!(last, vec![11, 12]);

        let (beyond, meta) = paginate(rows, 9, 5);
        assert!(beyond.is_empty());
        assert_eq!(meta.page, 9);
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err: AppError = RepoError::Duplicate("name".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        let err: AppError = RepoError::Database("down".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
