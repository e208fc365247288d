//! Todo entity.

use crate::{TodoId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new, incomplete todo for the given owner.
    #[must_use]
    pub fn new(user_id: UserId, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TodoId::new(),
            user_id,
            title,
            description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update; `None` leaves a field unchanged.
    pub fn apply(&mut self, title: Option<String>, description: Option<String>, completed: Option<bool>) {
        if let Some(title) = title {
            self.title = title;
        }
        if description.is_some() {
            self.description = description;
        }
        if let Some(completed) = completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
    }

    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update() {
        let owner = UserId::new();
        let mut todo = Todo::new(owner, "Buy milk".to_string(), None);
        assert!(!todo.completed);

        todo.apply(None, Some("2 litres".to_string()), Some(true));
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description.as_deref(), Some("2 litres"));
        assert!(todo.completed);
        assert!(todo.is_owned_by(owner));
        assert!(!todo.is_owned_by(UserId::new()));
    }
}
