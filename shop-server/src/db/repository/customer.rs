//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult, record};
use crate::db::models::customer::CUSTOMER_FIELDS;
use crate::db::models::{CustomerCreate, CustomerRow};
use crate::db::new_key;
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "customer";

/// Thrown by `delete_cascade` while placed orders exist
const OPEN_ORDERS_BLOCK: &str = "customer has placed orders";

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find customer by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CustomerRow>> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT {CUSTOMER_FIELDS} FROM $id"))
            .bind(("id", record(TABLE, id)))
            .await?;
        let customers: Vec<CustomerRow> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// Find customer by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<CustomerRow>> {
        let email = email.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT {CUSTOMER_FIELDS} FROM customer WHERE email = $email LIMIT 1"
            ))
            .bind(("email", email))
            .await?;
        let customers: Vec<CustomerRow> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// The account flagged `is_admin`
    pub async fn find_admin(&self) -> RepoResult<Option<CustomerRow>> {
        let customers: Vec<CustomerRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {CUSTOMER_FIELDS} FROM customer WHERE is_admin = true"
            ))
            .await?
            .take(0)?;
        Ok(customers.into_iter().next())
    }

    /// All regular (non-admin) customers, newest first
    pub async fn find_all_customers(&self) -> RepoResult<Vec<CustomerRow>> {
        let customers: Vec<CustomerRow> = self
            .base
            .db()
            .query(format!(
                "SELECT {CUSTOMER_FIELDS} FROM customer WHERE is_admin = false ORDER BY created_at DESC"
            ))
            .await?
            .take(0)?;
        Ok(customers)
    }

    /// Create a new customer
    pub async fn create(&self, data: CustomerCreate) -> RepoResult<CustomerRow> {
        let email = data.email.trim().to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                email
            )));
        }

        let key = new_key();
        self.base
            .db()
            .query(
                r#"CREATE $id SET
                    name = $name,
                    date_of_birth = $date_of_birth,
                    email = $email,
                    password_hash = $password_hash,
                    is_admin = $is_admin,
                    two_step_auth = false,
                    created_at = $now
                RETURN NONE"#,
            )
            .bind(("id", record(TABLE, &key)))
            .bind(("name", data.name))
            .bind(("date_of_birth", data.date_of_birth))
            .bind(("email", email))
            .bind(("password_hash", data.password_hash))
            .bind(("is_admin", data.is_admin))
            .bind(("now", now_millis()))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    /// Enable or disable two-step login
    pub async fn set_two_step(&self, id: &str, enabled: bool) -> RepoResult<CustomerRow> {
        self.base
            .db()
            .query("UPDATE $id SET two_step_auth = $enabled RETURN NONE")
            .bind(("id", record(TABLE, id)))
            .bind(("enabled", enabled))
            .await?
            .check()?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", id)))
    }

    /// Delete a customer together with their reviews and reports
    ///
    /// Orders stay as history. Returns `false`, and deletes nothing, while the
    /// customer still has `placed` orders; the check runs inside the same
    /// transaction as the deletes.
    pub async fn delete_cascade(&self, id: &str) -> RepoResult<bool> {
        let response = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                IF count(SELECT VALUE id FROM order WHERE customer = $customer AND status = 'placed') > 0 {
                    THROW $blocked;
                };
                DELETE review WHERE customer = $customer;
                DELETE report WHERE customer = $customer;
                DELETE $customer;
                COMMIT TRANSACTION;"#,
            )
            .bind(("customer", record(TABLE, id)))
            .bind(("blocked", OPEN_ORDERS_BLOCK))
            .await?;

        match response.check() {
            Ok(_) => Ok(true),
            Err(e) if e.to_string().contains(OPEN_ORDERS_BLOCK) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
