//! Startup seeding
//!
//! Exactly one admin exists: it is created from configuration the first time
//! the server starts against an empty database.

use crate::auth::password::hash_password;
use crate::core::config::AdminSeed;
use crate::db::models::{CustomerCreate, CustomerRow};
use crate::db::repository::CustomerRepository;
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult};

/// Create the admin account unless one already exists
///
/// Returns the stored admin either way.
pub async fn ensure_admin(
    customers: &CustomerRepository,
    seed: &AdminSeed,
) -> AppResult<CustomerRow> {
    if let Some(admin) = customers.find_admin().await? {
        tracing::debug!(admin = %admin.email, "Admin account present");
        return Ok(admin);
    }

    parse_date(&seed.date_of_birth)?;
    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;

    let admin = customers
        .create(CustomerCreate {
            name: seed.name.clone(),
            date_of_birth: seed.date_of_birth.clone(),
            email: seed.email.clone(),
            password_hash,
            is_admin: true,
        })
        .await?;

    tracing::info!(admin = %admin.email, "Admin account seeded");
    Ok(admin)
}
