//! User entity.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account holder. Usernames are unique in the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,

    /// Unique username, compared exactly (no case folding).
    pub username: String,

    /// Hashed password (never exposed via API).
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// User's first name.
    pub first_name: Option<String>,

    /// User's last name.
    pub last_name: Option<String>,

    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the given details.
    #[must_use]
    pub fn new(
        username: String,
        password_hash: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username,
            password_hash,
            first_name,
            last_name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the display name (full name or username).
    #[must_use]
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone(),
        }
    }

    /// Renames the user. Returns the previous username.
    pub fn rename(&mut self, username: String) -> String {
        self.touch();
        std::mem::replace(&mut self.username, username)
    }

    /// Replaces the password hash.
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.touch();
    }

    /// Updates the profile names; `None` leaves a field unchanged.
    pub fn update_profile(&mut self, first_name: Option<String>, last_name: Option<String>) {
        if first_name.is_some() {
            self.first_name = first_name;
        }
        if last_name.is_some() {
            self.last_name = last_name;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("alice".to_string(), "hash".to_string(), None, None)
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(user().display_name(), "alice");

        let mut named = user();
        named.update_profile(Some("Alice".to_string()), Some("Liddell".to_string()));
        assert_eq!(named.display_name(), "Alice Liddell");
    }

    #[test]
    fn test_rename_returns_previous() {
        let mut u = user();
        let previous = u.rename("alicia".to_string());
        assert_eq!(previous, "alice");
        assert_eq!(u.username, "alicia");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_string(&user()).unwrap();
        assert!(!json.contains("password_hash"));
    }
}
