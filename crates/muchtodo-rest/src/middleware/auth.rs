//! Auth gate: bearer-token check in front of protected routes.

use crate::extractors::AuthenticatedUser;
use crate::responses::AppError;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use muchtodo_core::{MuchTodoError, UserId};
use muchtodo_security::TokenProvider;
use std::sync::Arc;
use tracing::debug;

/// Authentication middleware state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub token_provider: Arc<TokenProvider>,
}

impl AuthMiddlewareState {
    #[must_use]
    pub fn new(token_provider: Arc<TokenProvider>) -> Self {
        Self { token_provider }
    }
}

/// The one rejection every failure path produces, so a caller cannot tell
/// a missing header from a forged or expired token.
#[must_use]
pub fn authentication_required() -> AppError {
    AppError(MuchTodoError::unauthorized("Authentication required"))
}

/// Rejects the request unless it carries `Authorization: Bearer <token>`
/// with a valid token. On success the caller's id is bound into the
/// request extensions as [`AuthenticatedUser`].
pub async fn require_auth(
    State(state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() else {
        debug!("Missing or malformed authorization header");
        return Err(authentication_required());
    };

    let subject = state.token_provider.validate(bearer.token()).map_err(|_| {
        debug!("Bearer token rejected");
        authentication_required()
    })?;

    let user_id = UserId::parse(&subject).map_err(|_| {
        debug!("Token subject is not a user id");
        authentication_required()
    })?;

    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}
