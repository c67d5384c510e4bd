//! Verification code delivery

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::with_message(ErrorCode::MailDeliveryFailed, err.to_string())
    }
}

/// Sends one-time codes to an address
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_code(&self, address: &str, code: &str) -> Result<(), MailError>;
}

/// Writes codes to the log instead of sending mail (development)
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification_code(&self, address: &str, code: &str) -> Result<(), MailError> {
        tracing::info!(target: "mail", address = %address, "Verification code issued");
        tracing::debug!(target: "mail", address = %address, code = %code, "Verification code");
        Ok(())
    }
}

/// Keeps the last code per address in memory
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: DashMap<String, String>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last code sent to `address`
    pub fn last_code(&self, address: &str) -> Option<String> {
        self.sent
            .get(&address.trim().to_lowercase())
            .map(|code| code.value().clone())
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send_verification_code(&self, address: &str, code: &str) -> Result<(), MailError> {
        self.sent
            .insert(address.trim().to_lowercase(), code.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_mailer_keeps_last_code() {
        let mailer = MemoryMailer::new();
        mailer
            .send_verification_code("Eve@Example.com", "123456")
            .await
            .unwrap();
        mailer
            .send_verification_code("eve@example.com", "654321")
            .await
            .unwrap();
        assert_eq!(mailer.last_code("eve@example.com").as_deref(), Some("654321"));
        assert!(mailer.last_code("nobody@example.com").is_none());
    }
}
