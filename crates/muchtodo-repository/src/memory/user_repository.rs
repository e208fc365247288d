//! In-memory user repository.

use crate::traits::UserRepository;
use async_trait::async_trait;
use muchtodo_core::{MuchTodoError, MuchTodoResult, User, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory user repository.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
    offline: AtomicBool,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the given users.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.users.write();
            for user in users {
                map.insert(user.id, user);
            }
        }
        repo
    }

    /// Simulates the store going away. Every call fails with `Database`
    /// until brought back online.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn ensure_online(&self) -> MuchTodoResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(MuchTodoError::Database("user store unavailable".to_string()));
        }
        Ok(())
    }
}

fn username_taken_by_other(map: &HashMap<UserId, User>, username: &str, id: UserId) -> bool {
    map.values().any(|u| u.username == username && u.id != id)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> MuchTodoResult<Option<User>> {
        self.ensure_online()?;
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> MuchTodoResult<Option<User>> {
        self.ensure_online()?;
        Ok(self.users.read().values().find(|u| u.username == username).cloned())
    }

    async fn list_usernames(&self) -> MuchTodoResult<Vec<String>> {
        self.ensure_online()?;
        Ok(self.users.read().values().map(|u| u.username.clone()).collect())
    }

    async fn save(&self, user: &User) -> MuchTodoResult<User> {
        self.ensure_online()?;
        let mut map = self.users.write();
        if username_taken_by_other(&map, &user.username, user.id) {
            return Err(MuchTodoError::conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        if map.contains_key(&user.id) {
            return Err(MuchTodoError::conflict(format!("User {} already exists", user.id)));
        }
        map.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> MuchTodoResult<User> {
        self.ensure_online()?;
        let mut map = self.users.write();
        if !map.contains_key(&user.id) {
            return Err(MuchTodoError::not_found("User", user.id));
        }
        if username_taken_by_other(&map, &user.username, user.id) {
            return Err(MuchTodoError::conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        map.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> MuchTodoResult<bool> {
        self.ensure_online()?;
        Ok(self.users.write().remove(&id).is_some())
    }

    async fn health_check(&self) -> MuchTodoResult<()> {
        self.ensure_online()
    }
}
