//! In-memory todo repository.

use crate::traits::TodoRepository;
use async_trait::async_trait;
use muchtodo_core::{MuchTodoError, MuchTodoResult, Todo, TodoId, UserId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory todo repository.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<HashMap<TodoId, Todo>>,
}

impl InMemoryTodoRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn save(&self, todo: &Todo) -> MuchTodoResult<Todo> {
        let mut map = self.todos.write();
        if map.contains_key(&todo.id) {
            return Err(MuchTodoError::conflict(format!("Todo {} already exists", todo.id)));
        }
        map.insert(todo.id, todo.clone());
        Ok(todo.clone())
    }

    async fn find_by_id(&self, id: TodoId) -> MuchTodoResult<Option<Todo>> {
        Ok(self.todos.read().get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> MuchTodoResult<Vec<Todo>> {
        let mut todos: Vec<Todo> = self
            .todos
            .read()
            .values()
            .filter(|t| t.is_owned_by(user_id))
            .cloned()
            .collect();
        // v7 ids are time-ordered; they break ties between equal timestamps
        todos.sort_by(|a, b| (b.created_at, b.id.0).cmp(&(a.created_at, a.id.0)));
        Ok(todos)
    }

    async fn update(&self, todo: &Todo) -> MuchTodoResult<Todo> {
        let mut map = self.todos.write();
        match map.get_mut(&todo.id) {
            Some(existing) => {
                *existing = todo.clone();
                Ok(todo.clone())
            }
            None => Err(MuchTodoError::not_found("Todo", todo.id)),
        }
    }

    async fn delete(&self, id: TodoId) -> MuchTodoResult<bool> {
        Ok(self.todos.write().remove(&id).is_some())
    }

    async fn delete_by_user(&self, user_id: UserId) -> MuchTodoResult<u64> {
        let mut map = self.todos.write();
        let before = map.len();
        map.retain(|_, t| !t.is_owned_by(user_id));
        Ok((before - map.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_user_newest_first() {
        let repo = InMemoryTodoRepository::new();
        let owner = UserId::new();
        let first = repo.save(&Todo::new(owner, "first".to_string(), None)).await.unwrap();
        let second = repo.save(&Todo::new(owner, "second".to_string(), None)).await.unwrap();
        repo.save(&Todo::new(UserId::new(), "other".to_string(), None)).await.unwrap();

        let todos = repo.find_by_user(owner).await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].id, second.id);
        assert_eq!(todos[1].id, first.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = InMemoryTodoRepository::new();
        let mut todo = repo
            .save(&Todo::new(UserId::new(), "task".to_string(), None))
            .await
            .unwrap();

        todo.apply(None, None, Some(true));
        let updated = repo.update(&todo).await.unwrap();
        assert!(updated.completed);

        assert!(repo.delete(todo.id).await.unwrap());
        assert!(!repo.delete(todo.id).await.unwrap());
        assert!(matches!(
            repo.update(&todo).await,
            Err(MuchTodoError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_by_user() {
        let repo = InMemoryTodoRepository::new();
        let owner = UserId::new();
        let other = UserId::new();
        for title in ["a", "b", "c"] {
            repo.save(&Todo::new(owner, title.to_string(), None)).await.unwrap();
        }
        repo.save(&Todo::new(other, "keep".to_string(), None)).await.unwrap();

        assert_eq!(repo.delete_by_user(owner).await.unwrap(), 3);
        assert!(repo.find_by_user(owner).await.unwrap().is_empty());
        assert_eq!(repo.find_by_user(other).await.unwrap().len(), 1);
    }
}
