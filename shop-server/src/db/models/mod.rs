//! Database Models
//!
//! Row shapes read back from SurrealDB. Record ids are projected to their
//! bare key with `record::id(..)`, so every row carries plain string ids.

pub mod serde_helpers;

pub mod customer;
pub mod order;
pub mod product;
pub mod report;
pub mod review;

// Re-exports
pub use customer::{CustomerCreate, CustomerRow};
pub use order::{OrderLineInsert, OrderLineRow, OrderRow, OrderStatusRow};
pub use product::{ProductRow, StockRow};
pub use report::ReportRow;
pub use review::ReviewRow;
