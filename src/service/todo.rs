//! Todo listing and mutations.

use crate::db::{Database, Todo};
use crate::error::AppError;
use crate::extractors::FromAppState;
use crate::schema::Page;
use crate::state::AppState;

#[derive(Clone)]
pub struct TodoService {
    db: Database,
}

impl TodoService {
    pub fn new(db: Database) -> Self {
        TodoService { db }
    }

    /// One page of todos plus the total count.
    pub async fn list(&self, page: Page) -> Result<(Vec<Todo>, u64), AppError> {
        let todos = self.db.todo.find_many(page.skip, page.take).await?;
        let total = self.db.todo.count().await?;
        Ok((todos, total))
    }

    pub async fn get(&self, id: i64) -> Result<Todo, AppError> {
        self.db
            .todo
            .find_unique(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("todo {}", id)))
    }

    pub async fn create(&self, title: &str) -> Result<Todo, AppError> {
        let todo = self.db.todo.create(title.trim()).await?;
        tracing::debug!(todo_id = todo.id, "todo created");
        Ok(todo)
    }

    pub async fn rename(&self, id: i64, title: &str) -> Result<Todo, AppError> {
        self.db
            .todo
            .update(id, title.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("todo {}", id)))
    }

    pub async fn remove(&self, id: i64) -> Result<Todo, AppError> {
        self.db
            .todo
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("todo {}", id)))
    }
}

impl FromAppState for TodoService {
    fn from_app_state(_state: &AppState, db: &Database) -> Self {
        TodoService::new(db.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_returns_page_and_total() {
        let todos = TodoService::new(Database::in_memory());
        for t in ["a", "b", "c"] {
            todos.create(t).await.unwrap();
        }
        let (items, total) = todos.list(Page { skip: 2, take: 20 }).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "c");
    }

    #[tokio::test]
    async fn titles_are_trimmed() {
        let todos = TodoService::new(Database::in_memory());
        let t = todos.create("  Workout ").await.unwrap();
        assert_eq!(t.title, "Workout");
        assert_eq!(todos.rename(t.id, " Run ").await.unwrap().title, "Run");
    }

    #[tokio::test]
    async fn missing_todo_is_not_found() {
        let todos = TodoService::new(Database::in_memory());
        assert!(matches!(todos.get(9).await, Err(AppError::NotFound(_))));
        assert!(matches!(todos.rename(9, "x").await, Err(AppError::NotFound(_))));
        assert!(matches!(todos.remove(9).await, Err(AppError::NotFound(_))));
    }
}
