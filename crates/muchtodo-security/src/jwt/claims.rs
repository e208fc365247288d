//! Session token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
///
/// No random token id is embedded, so the same key, subject and clock
/// always produce the same token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user identifier).
    pub sub: String,

    /// Issued at (seconds since epoch).
    pub iat: i64,

    /// Expiration (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn new(subject: impl Into<String>, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: subject.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Strict comparison: a token is dead at the exact second it expires.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let claims = Claims::new("u123", now, now + Duration::hours(1));

        assert!(!claims.is_expired_at(now));
        assert!(!claims.is_expired_at(now + Duration::minutes(59)));
        assert!(claims.is_expired_at(now + Duration::hours(1)));
    }
}
