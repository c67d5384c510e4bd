//! Shared types for the storefront
//!
//! Error codes, the API response envelope, pagination and the request and
//! response models used by the server and its clients.

pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
