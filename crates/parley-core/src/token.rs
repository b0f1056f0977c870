//! Usage tokens.
//!
//! A usage token is a short-lived credential minted once per page entry. It
//! authorizes both the remote API calls and the real-time session.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ParleyError, Result};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl UsageToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// A token is expired at or after its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the raw token if it is still valid at `now`.
    pub fn valid_at(&self, now: DateTime<Utc>) -> Result<&str> {
        if self.token.trim().is_empty() {
            return Err(ParleyError::validation("Usage token is empty"));
        }
        if self.is_expired_at(now) {
            return Err(ParleyError::ExpiredToken {
                expired_at: self.expires_at.to_rfc3339(),
            });
        }
        Ok(&self.token)
    }
}

// The raw credential never ends up in logs.
impl fmt::Debug for UsageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Mints usage tokens. Implemented by the server-side collaborator.
#[async_trait::async_trait]
pub trait TokenMinter: Send + Sync {
    async fn mint(&self) -> Result<UsageToken>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let token = UsageToken::new("tok", now);
        assert!(token.is_expired_at(now));
        assert!(!token.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_valid_at() {
        let now = Utc::now();
        let token = UsageToken::new("tok", now + Duration::minutes(5));
        assert_eq!(token.valid_at(now).unwrap(), "tok");

        let expired = UsageToken::new("tok", now - Duration::minutes(5));
        assert!(matches!(
            expired.valid_at(now),
            Err(ParleyError::ExpiredToken { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = UsageToken::new("secret-value", Utc::now());
        assert!(!format!("{:?}", token).contains("secret-value"));
    }
}
