//! One-time verification codes
//!
//! Codes are keyed by `(purpose, address)`, so a registration code and a
//! login code for the same address never clobber each other. Each code is
//! single-use, expires after the configured TTL and tolerates a bounded
//! number of wrong guesses.

use std::fmt;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use rand::Rng;
use thiserror::Error;

use crate::utils::{AppError, ErrorCode};

/// Wrong guesses allowed before the pending code is discarded
pub const MAX_ATTEMPTS: u32 = 5;

/// What a code was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodePurpose {
    Registration,
    Login,
}

impl fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodePurpose::Registration => write!(f, "registration"),
            CodePurpose::Login => write!(f, "login"),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingCode {
    code: String,
    expires_at: Instant,
    attempts: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("No verification code was issued for this address")]
    NotIssued,

    #[error("Verification code expired")]
    Expired,

    #[error("Incorrect verification code ({remaining} attempts left)")]
    Mismatch { remaining: u32 },

    #[error("Too many incorrect attempts, request a new code")]
    TooManyAttempts,
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        let code = match &err {
            VerificationError::NotIssued | VerificationError::Mismatch { .. } => {
                ErrorCode::VerificationCodeInvalid
            }
            VerificationError::Expired => ErrorCode::VerificationCodeExpired,
            VerificationError::TooManyAttempts => ErrorCode::TooManyAttempts,
        };
        let app = AppError::with_message(code, err.to_string());
        match err {
            VerificationError::Mismatch { remaining } => app.with_detail("remaining", remaining),
            _ => app,
        }
    }
}

/// Pending verification codes
#[derive(Debug)]
pub struct VerificationCodes {
    pending: DashMap<(CodePurpose, String), PendingCode>,
    ttl: Duration,
}

impl VerificationCodes {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: DashMap::new(),
            ttl,
        }
    }

    /// Issue a fresh 6-digit code, replacing any pending one
    pub fn issue(&self, purpose: CodePurpose, address: &str) -> String {
        let code = rand::thread_rng().gen_range(100_000..=999_999).to_string();
        self.pending.insert(
            (purpose, normalize(address)),
            PendingCode {
                code: code.clone(),
                expires_at: Instant::now() + self.ttl,
                attempts: 0,
            },
        );
        code
    }

    /// Check and consume a code
    ///
    /// A correct code is removed; so is an expired one and one that ran out
    /// of attempts.
    pub fn verify(
        &self,
        purpose: CodePurpose,
        address: &str,
        code: &str,
    ) -> Result<(), VerificationError> {
        let key = (purpose, normalize(address));

        let outcome = {
            let Some(mut entry) = self.pending.get_mut(&key) else {
                return Err(VerificationError::NotIssued);
            };
            if Instant::now() >= entry.expires_at {
                Err(VerificationError::Expired)
            } else if entry.code == code.trim() {
                Ok(())
            } else {
                entry.attempts += 1;
                if entry.attempts >= MAX_ATTEMPTS {
                    Err(VerificationError::TooManyAttempts)
                } else {
                    Err(VerificationError::Mismatch {
                        remaining: MAX_ATTEMPTS - entry.attempts,
                    })
                }
            }
        };

        if !matches!(outcome, Err(VerificationError::Mismatch { .. })) {
            self.pending.remove(&key);
        }
        outcome
    }

    /// Drop expired codes, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.pending.len();
        self.pending.retain(|_, pending| pending.expires_at > now);
        before.saturating_sub(self.pending.len())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_single_use() {
        let codes = VerificationCodes::new(Duration::from_secs(600));
        let code = codes.issue(CodePurpose::Registration, "Alice@Example.com");
        assert_eq!(code.len(), 6);

        assert_eq!(
            codes.verify(CodePurpose::Registration, "alice@example.com", &code),
            Ok(())
        );
        assert_eq!(
            codes.verify(CodePurpose::Registration, "alice@example.com", &code),
            Err(VerificationError::NotIssued)
        );
    }

    #[test]
    fn test_purposes_are_separate() {
        let codes = VerificationCodes::new(Duration::from_secs(600));
        let code = codes.issue(CodePurpose::Login, "bob@example.com");
        assert_eq!(
            codes.verify(CodePurpose::Registration, "bob@example.com", &code),
            Err(VerificationError::NotIssued)
        );
        assert!(codes.verify(CodePurpose::Login, "bob@example.com", &code).is_ok());
    }

    #[test]
    fn test_expired_code_is_rejected_and_removed() {
        let codes = VerificationCodes::new(Duration::ZERO);
        let code = codes.issue(CodePurpose::Login, "carol@example.com");
        assert_eq!(
            codes.verify(CodePurpose::Login, "carol@example.com", &code),
            Err(VerificationError::Expired)
        );
        assert!(codes.is_empty());
    }

    #[test]
    fn test_attempts_are_bounded() {
        let codes = VerificationCodes::new(Duration::from_secs(600));
        let code = codes.issue(CodePurpose::Login, "dave@example.com");
        let wrong = if code == "111111" { "222222" } else { "111111" };

        for remaining in (1..MAX_ATTEMPTS).rev() {
            assert_eq!(
                codes.verify(CodePurpose::Login, "dave@example.com", wrong),
                Err(VerificationError::Mismatch { remaining })
            );
        }
        assert_eq!(
            codes.verify(CodePurpose::Login, "dave@example.com", wrong),
            Err(VerificationError::TooManyAttempts)
        );
        // The right code no longer helps
        assert_eq!(
            codes.verify(CodePurpose::Login, "dave@example.com", &code),
            Err(VerificationError::NotIssued)
        );
    }

    #[test]
    fn test_purge_expired() {
        let expired = VerificationCodes::new(Duration::ZERO);
        expired.issue(CodePurpose::Login, "a@example.com");
        expired.issue(CodePurpose::Registration, "b@example.com");
        assert_eq!(expired.purge_expired(), 2);

        let fresh = VerificationCodes::new(Duration::from_secs(600));
        fresh.issue(CodePurpose::Login, "a@example.com");
        assert_eq!(fresh.purge_expired(), 0);
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn test_error_codes() {
        let err: AppError = VerificationError::Expired.into();
        assert_eq!(err.code, ErrorCode::VerificationCodeExpired);
        let err: AppError = VerificationError::Mismatch { remaining: 2 }.into();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
        assert!(err.details.unwrap().contains_key("remaining"));
    }
}
