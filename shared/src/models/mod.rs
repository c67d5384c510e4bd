//! API data models
//!
//! Shared request and response shapes. Field names are camelCase on the
//! wire except where the storefront client already sends snake_case
//! (order line requests).

pub mod customer;
pub mod order;
pub mod product;
pub mod report;
pub mod review;

// Re-exports
pub use customer::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use review::*;
