//! Customer Model

use super::serde_helpers;
use serde::Deserialize;
use shared::models::Customer;

pub const CUSTOMER_FIELDS: &str = "record::id(id) AS id, name, date_of_birth, email, \
     password_hash, is_admin, two_step_auth, created_at";

/// Customer row, including the argon2 PHC hash
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub date_of_birth: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub two_step_auth: bool,
    pub created_at: i64,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            date_of_birth: row.date_of_birth,
            email: row.email,
            is_admin: row.is_admin,
            two_step_auth: row.two_step_auth,
            created_at: row.created_at,
        }
    }
}

/// Create customer payload (password already hashed)
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub name: String,
    pub date_of_birth: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}
