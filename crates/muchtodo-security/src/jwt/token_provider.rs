//! Token service: issues and validates signed session tokens.

use super::Claims;
use crate::clock::{Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use muchtodo_config::SecurityConfig;
use muchtodo_core::{MuchTodoError, MuchTodoResult};
use std::sync::Arc;
use tracing::debug;

/// A freshly issued token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HS256 token provider.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenProvider {
    /// Creates a provider from the security configuration and a clock.
    pub fn new(config: &SecurityConfig, clock: Arc<dyn Clock>) -> MuchTodoResult<Self> {
        if config.jwt_secret.is_empty() {
            return Err(MuchTodoError::Configuration("jwt_secret must not be empty".to_string()));
        }
        let lifetime = Duration::from_std(config.token_lifetime())
            .map_err(|e| MuchTodoError::Configuration(format!("Invalid token lifetime: {}", e)))?;

        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against the injected clock instead
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            lifetime,
            clock,
        })
    }

    /// Creates a provider backed by the wall clock.
    pub fn with_system_clock(config: &SecurityConfig) -> MuchTodoResult<Self> {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Returns the configured token lifetime.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issues a token for `subject`, returning the encoded token only.
    pub fn issue(&self, subject: &str) -> MuchTodoResult<String> {
        self.issue_token(subject).map(|issued| issued.token)
    }

    /// Issues a token for `subject` expiring after the configured lifetime.
    pub fn issue_token(&self, subject: &str) -> MuchTodoResult<IssuedToken> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| MuchTodoError::Internal("Token expiry is out of range".to_string()))?;
        let claims = Claims::new(subject, now, expires_at);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| MuchTodoError::Internal(format!("Failed to issue token: {}", e)))?;

        debug!("Issued token for subject {}", subject);
        Ok(IssuedToken { token, expires_at })
    }

    /// Validates a token and returns its subject.
    ///
    /// Malformed, forged and expired tokens all yield the same
    /// [`MuchTodoError::InvalidToken`].
    pub fn validate(&self, token: &str) -> MuchTodoResult<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Token rejected: {:?}", e.kind());
            MuchTodoError::InvalidToken
        })?;

        if data.claims.is_expired_at(self.clock.now()) {
            debug!("Token rejected: expired");
            return Err(MuchTodoError::InvalidToken);
        }

        Ok(data.claims.sub)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}
