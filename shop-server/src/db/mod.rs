//! Database Module
//!
//! Embedded SurrealDB connection and schema definition.

pub mod models;
pub mod repository;
pub mod seed;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::core::Config;
use crate::core::config::DatabaseMode;
use crate::utils::AppError;

const NAMESPACE: &str = "shop";
const DATABASE: &str = "shop";

/// Tables, unique constraints and lookup indexes
///
/// `order_line` rows link an order to a product; both links are indexed so
/// lines can be walked per order and outstanding lines counted per product.
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
DEFINE INDEX IF NOT EXISTS product_name ON TABLE product FIELDS name UNIQUE;

DEFINE TABLE IF NOT EXISTS customer SCHEMALESS;
DEFINE INDEX IF NOT EXISTS customer_email ON TABLE customer FIELDS email UNIQUE;
DEFINE INDEX IF NOT EXISTS customer_admin ON TABLE customer FIELDS is_admin;

DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_customer ON TABLE order FIELDS customer;

DEFINE TABLE IF NOT EXISTS order_line SCHEMALESS;
DEFINE INDEX IF NOT EXISTS order_line_order ON TABLE order_line FIELDS order_id;
DEFINE INDEX IF NOT EXISTS order_line_product ON TABLE order_line FIELDS product_id;

DEFINE TABLE IF NOT EXISTS review SCHEMALESS;
DEFINE INDEX IF NOT EXISTS review_product ON TABLE review FIELDS product;
DEFINE INDEX IF NOT EXISTS review_customer ON TABLE review FIELDS customer;

DEFINE TABLE IF NOT EXISTS report SCHEMALESS;
DEFINE INDEX IF NOT EXISTS report_customer ON TABLE report FIELDS customer;
"#;

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the engine selected by `DATABASE_MODE` and apply the schema
    pub async fn open(config: &Config) -> Result<Self, AppError> {
        let db = match config.database_mode {
            DatabaseMode::Memory => Surreal::new::<Mem>(()).await,
            DatabaseMode::RocksDb => {
                let path = config.database_dir().join("shop.db");
                Surreal::new::<RocksDb>(path).await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(mode = ?config.database_mode, "Database connection established");

        Self::prepare(db).await
    }

    /// Select namespace/database and define the schema on an open handle
    pub async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select database: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }

    /// Round-trip query used by the health check
    pub async fn ping(&self) -> Result<(), AppError> {
        self.db
            .query("RETURN true")
            .await
            .and_then(|response| response.check())
            .map(|_| ())
            .map_err(|e| AppError::database(e.to_string()))
    }
}

/// New record key (uuid v4, hyphen-free)
pub fn new_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
