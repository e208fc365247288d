//! Registration, login and username checks.

use crate::availability::UsernameAvailabilityService;
use crate::dto::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse,
    UsernameAvailabilityResponse,
};
use async_trait::async_trait;
use muchtodo_core::{MuchTodoError, MuchTodoResult, User, ValidateExt};
use muchtodo_repository::UserRepository;
use muchtodo_security::{PasswordHasher, TokenProvider};
use std::sync::Arc;
use tracing::{debug, info};

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and returns a session token for it.
    async fn register(&self, request: RegisterRequest) -> MuchTodoResult<AuthResponse>;

    /// Verifies credentials and returns a session token.
    async fn login(&self, request: LoginRequest) -> MuchTodoResult<AuthResponse>;

    /// Tokens are not tracked server side; the client discards its token.
    async fn logout(&self) -> MuchTodoResult<MessageResponse>;

    /// Reports whether a username can still be registered.
    async fn check_username(&self, username: &str) -> MuchTodoResult<UsernameAvailabilityResponse>;
}

/// Authentication service implementation.
pub struct AuthServiceImpl {
    users: Arc<dyn UserRepository>,
    availability: Arc<UsernameAvailabilityService>,
    password_hasher: Arc<PasswordHasher>,
    token_provider: Arc<TokenProvider>,
}

impl AuthServiceImpl {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        availability: Arc<UsernameAvailabilityService>,
        password_hasher: Arc<PasswordHasher>,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        Self {
            users,
            availability,
            password_hasher,
            token_provider,
        }
    }

    fn create_auth_response(&self, user: &User) -> MuchTodoResult<AuthResponse> {
        let issued = self.token_provider.issue_token(&user.id.to_string())?;

        Ok(AuthResponse {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
            user: UserResponse::from(user),
        })
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: RegisterRequest) -> MuchTodoResult<AuthResponse> {
        debug!("Registering user: {}", request.username);

        request.validate_request()?;

        if !self.availability.is_available(&request.username).await? {
            return Err(MuchTodoError::conflict(format!(
                "Username '{}' is already taken",
                request.username
            )));
        }

        let password_hash = self.password_hasher.hash(&request.password)?;
        let user = User::new(
            request.username,
            password_hash,
            request.first_name,
            request.last_name,
        );

        // the unique index settles concurrent registrations of the same name
        let user = self.users.save(&user).await?;
        self.availability.mark_taken(&user.username).await;

        info!("User registered: {} ({})", user.username, user.id);
        self.create_auth_response(&user)
    }

    async fn login(&self, request: LoginRequest) -> MuchTodoResult<AuthResponse> {
        debug!("Login attempt for: {}", request.username);

        request.validate_request()?;

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or(MuchTodoError::InvalidCredentials)?;

        if !self.password_hasher.verify(&request.password, &user.password_hash)? {
            debug!("Invalid password for user: {}", user.id);
            return Err(MuchTodoError::InvalidCredentials);
        }

        info!("User logged in: {}", user.id);
        self.create_auth_response(&user)
    }

    async fn logout(&self) -> MuchTodoResult<MessageResponse> {
        Ok(MessageResponse::new("Logged out successfully"))
    }

    async fn check_username(&self, username: &str) -> MuchTodoResult<UsernameAvailabilityResponse> {
        let available = self.availability.is_available(username).await?;
        Ok(UsernameAvailabilityResponse {
            username: username.to_string(),
            available,
        })
    }
}
