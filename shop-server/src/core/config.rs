use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::{AppError, AppResult, ErrorCode};

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志、图片) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | production 时为 true | JSON 日志 |
/// | LOG_TO_FILE | false | 写入 WORK_DIR/logs |
/// | DATABASE_MODE | rocksdb | rocksdb \| memory |
/// | PAGE_SIZE | 5 | 分页大小 |
/// | VERIFICATION_CODE_TTL_SECS | 600 | 验证码有效期 |
/// | ORDER_ROLLBACK_PARTIAL | true | 下单失败时释放已预留库存 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | MAX_IMAGE_BYTES | 5242880 | 上传图片大小上限 |
/// | ADMIN_NAME / ADMIN_EMAIL / ADMIN_PASSWORD | 见 [`AdminSeed`] | 初始管理员 |
/// | JWT_SECRET / JWT_EXPIRATION_MINUTES / JWT_ISSUER / JWT_AUDIENCE | 见 [`JwtConfig`] | 令牌 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/shop HTTP_PORT=8080 cargo run -p shop-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志、图片
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_to_file: bool,
    pub database_mode: DatabaseMode,
    /// 列表接口的分页大小
    pub page_size: u32,
    pub verification_code_ttl_secs: u64,
    pub orders: OrderConfig,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub max_image_bytes: usize,
    pub admin: AdminSeed,
    /// JWT 认证配置
    pub jwt: JwtConfig,
}

/// Storage engine behind the embedded database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseMode {
    /// On-disk RocksDB under `WORK_DIR/database`
    RocksDb,
    /// Volatile in-memory engine
    Memory,
}

impl DatabaseMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rocksdb" | "disk" => Some(Self::RocksDb),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Order placement policy
#[derive(Debug, Clone, Copy)]
pub struct OrderConfig {
    /// Release reservations already made for earlier lines when a later line fails
    pub rollback_partial_reservations: bool,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            rollback_partial_reservations: true,
        }
    }
}

/// The single admin account created at first start
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: String,
}

impl AdminSeed {
    fn from_env() -> Self {
        Self {
            name: env_or("ADMIN_NAME", "Administrator"),
            email: env_or("ADMIN_EMAIL", "admin@shop.local").to_lowercase(),
            password: env_or("ADMIN_PASSWORD", "admin12345"),
            date_of_birth: env_or("ADMIN_DATE_OF_BIRTH", "1970-01-01"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let environment = env_or("ENVIRONMENT", "development");
        let is_production = environment == "production";

        Self {
            work_dir: env_or("WORK_DIR", "./data"),
            http_port: env_parse("HTTP_PORT", 5000),
            log_level: env_or("LOG_LEVEL", "info"),
            log_json: env_parse("LOG_JSON", is_production),
            log_to_file: env_parse("LOG_TO_FILE", false),
            database_mode: std::env::var("DATABASE_MODE")
                .ok()
                .and_then(|v| DatabaseMode::parse(&v))
                .unwrap_or(DatabaseMode::RocksDb),
            page_size: env_parse("PAGE_SIZE", 5u32).max(1),
            verification_code_ttl_secs: env_parse("VERIFICATION_CODE_TTL_SECS", 600),
            orders: OrderConfig {
                rollback_partial_reservations: env_parse("ORDER_ROLLBACK_PARTIAL", true),
            },
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 30000),
            max_image_bytes: env_parse("MAX_IMAGE_BYTES", 5 * 1024 * 1024),
            admin: AdminSeed::from_env(),
            jwt: JwtConfig::default(),
            environment,
        }
    }

    /// In-memory configuration rooted at `work_dir`
    ///
    /// 常用于测试场景
    pub fn in_memory(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "debug".into(),
            log_json: false,
            log_to_file: false,
            database_mode: DatabaseMode::Memory,
            page_size: 5,
            verification_code_ttl_secs: 600,
            orders: OrderConfig::default(),
            request_timeout_ms: 30000,
            max_image_bytes: 5 * 1024 * 1024,
            admin: AdminSeed {
                name: "Administrator".into(),
                email: "admin@shop.local".into(),
                password: "admin12345".into(),
                date_of_birth: "1970-01-01".into(),
            },
            jwt: JwtConfig::with_secret("test-secret-with-at-least-32-characters!!"),
        }
    }

    /// Reject configurations that must not reach production
    pub fn validate(&self) -> AppResult<()> {
        if self.is_production() {
            if std::env::var("JWT_SECRET").is_err() {
                return Err(AppError::with_message(
                    ErrorCode::ConfigError,
                    "JWT_SECRET must be set in production",
                ));
            }
            if std::env::var("ADMIN_PASSWORD").is_err() {
                return Err(AppError::with_message(
                    ErrorCode::ConfigError,
                    "ADMIN_PASSWORD must be set in production",
                ));
            }
        }
        if self.jwt.secret.len() < 32 {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "JWT_SECRET must be at least 32 characters long",
            ));
        }
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("images")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        std::fs::create_dir_all(self.images_dir())?;
        if self.database_mode == DatabaseMode::RocksDb {
            std::fs::create_dir_all(self.database_dir())?;
        }
        if self.log_to_file {
            std::fs::create_dir_all(self.log_dir())?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_mode_parse() {
        assert_eq!(DatabaseMode::parse("memory"), Some(DatabaseMode::Memory));
        assert_eq!(DatabaseMode::parse(" RocksDB "), Some(DatabaseMode::RocksDb));
        assert_eq!(DatabaseMode::parse("sqlite"), None);
    }

    #[test]
    fn test_in_memory_defaults() {
        let config = Config::in_memory("/tmp/shop-test");
        assert_eq!(config.page_size, 5);
        assert!(config.orders.rollback_partial_reservations);
        assert_eq!(config.images_dir(), PathBuf::from("/tmp/shop-test/images"));
        assert!(config.validate().is_ok());
    }
}
