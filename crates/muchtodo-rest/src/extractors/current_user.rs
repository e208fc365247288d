//! Authenticated caller extractor.

use crate::middleware::authentication_required;
use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use muchtodo_core::UserId;

/// The caller's id, bound by the auth gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl std::ops::Deref for AuthenticatedUser {
    type Target = UserId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(authentication_required)
    }
}
