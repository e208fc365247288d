//! Account management for the authenticated user.

use crate::availability::UsernameAvailabilityService;
use crate::dto::{ChangePasswordRequest, MessageResponse, UpdateUserRequest, UserResponse};
use async_trait::async_trait;
use muchtodo_core::{MuchTodoError, MuchTodoResult, User, UserId, ValidateExt};
use muchtodo_repository::{TodoRepository, UserRepository};
use muchtodo_security::PasswordHasher;
use std::sync::Arc;
use tracing::{debug, info};

/// User service trait.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_current(&self, user_id: UserId) -> MuchTodoResult<UserResponse>;

    /// Updates the profile; a username change is checked for uniqueness.
    async fn update_current(&self, user_id: UserId, request: UpdateUserRequest) -> MuchTodoResult<UserResponse>;

    async fn change_password(
        &self,
        user_id: UserId,
        request: ChangePasswordRequest,
    ) -> MuchTodoResult<MessageResponse>;

    /// Deletes the account and every todo it owns.
    async fn delete_current(&self, user_id: UserId) -> MuchTodoResult<()>;
}

/// User service implementation.
pub struct UserServiceImpl {
    users: Arc<dyn UserRepository>,
    todos: Arc<dyn TodoRepository>,
    availability: Arc<UsernameAvailabilityService>,
    password_hasher: Arc<PasswordHasher>,
}

impl UserServiceImpl {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        todos: Arc<dyn TodoRepository>,
        availability: Arc<UsernameAvailabilityService>,
        password_hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            users,
            todos,
            availability,
            password_hasher,
        }
    }

    async fn load(&self, user_id: UserId) -> MuchTodoResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| MuchTodoError::not_found("User", user_id))
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_current(&self, user_id: UserId) -> MuchTodoResult<UserResponse> {
        self.load(user_id).await.map(UserResponse::from)
    }

    async fn update_current(&self, user_id: UserId, request: UpdateUserRequest) -> MuchTodoResult<UserResponse> {
        request.validate_request()?;

        let mut user = self.load(user_id).await?;

        let renamed_from = match request.username {
            Some(username) if username != user.username => {
                if !self.availability.is_available(&username).await? {
                    return Err(MuchTodoError::conflict(format!(
                        "Username '{}' is already taken",
                        username
                    )));
                }
                Some(user.rename(username))
            }
            _ => None,
        };
        user.update_profile(request.first_name, request.last_name);

        let user = self.users.update(&user).await?;

        if let Some(previous) = renamed_from {
            self.availability.release(&previous).await;
            self.availability.mark_taken(&user.username).await;
            info!("User {} renamed from {} to {}", user.id, previous, user.username);
        }

        debug!("Updated user {}", user.id);
        Ok(UserResponse::from(user))
    }

    async fn change_password(
        &self,
        user_id: UserId,
        request: ChangePasswordRequest,
    ) -> MuchTodoResult<MessageResponse> {
        request.validate_request()?;

        let mut user = self.load(user_id).await?;
        if !self
            .password_hasher
            .verify(&request.current_password, &user.password_hash)?
        {
            return Err(MuchTodoError::InvalidCredentials);
        }

        user.set_password_hash(self.password_hasher.hash(&request.new_password)?);
        self.users.update(&user).await?;

        info!("Password changed for user {}", user.id);
        Ok(MessageResponse::new("Password updated successfully"))
    }

    async fn delete_current(&self, user_id: UserId) -> MuchTodoResult<()> {
        let user = self.load(user_id).await?;

        let removed = self.todos.delete_by_user(user_id).await?;
        if !self.users.delete(user_id).await? {
            return Err(MuchTodoError::not_found("User", user_id));
        }
        self.availability.release(&user.username).await;

        info!("Deleted user {} and {} todos", user_id, removed);
        Ok(())
    }
}
