//! In-process stores with the same semantics as the SQLite ones, including `Conflict`
//! for duplicate user ids.

use super::{NewUser, Todo, TodoStore, User, UserPatch, UserStore};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("in-memory store lock poisoned".into())
}

#[derive(Default)]
pub struct MemoryUserStore {
    rows: RwLock<BTreeMap<String, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_unique(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.rows.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn find_many(&self) -> Result<Vec<User>, AppError> {
        let rows = self.rows.read().map_err(poisoned)?;
        let mut users: Vec<User> = rows.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        if rows.contains_key(&user.id) {
            return Err(AppError::Conflict(format!("user '{}' already exists", user.id)));
        }
        let row = User {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            created_at: Utc::now(),
        };
        rows.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn update(&self, id: &str, patch: &UserPatch) -> Result<Option<User>, AppError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        let Some(row) = rows.get_mut(id) else {
            return Ok(None);
        };
        if let Some(v) = &patch.first_name {
            row.first_name = v.clone();
        }
        if let Some(v) = &patch.full_name {
            row.full_name = v.clone();
        }
        if let Some(v) = &patch.email {
            row.email = v.clone();
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.rows.write().map_err(poisoned)?.remove(id))
    }
}

#[derive(Default)]
pub struct MemoryTodoStore {
    inner: RwLock<TodoRows>,
}

#[derive(Default)]
struct TodoRows {
    next_id: i64,
    rows: BTreeMap<i64, Todo>,
}

impl TodoRows {
    fn insert(&mut self, title: &str) -> Todo {
        self.next_id += 1;
        let todo = Todo {
            id: self.next_id,
            title: title.to_string(),
            created_at: Utc::now(),
        };
        self.rows.insert(todo.id, todo.clone());
        todo
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn find_many(&self, skip: u64, take: u32) -> Result<Vec<Todo>, AppError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .rows
            .values()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(take as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.inner.read().map_err(poisoned)?.rows.len() as u64)
    }

    async fn find_unique(&self, id: i64) -> Result<Option<Todo>, AppError> {
        Ok(self.inner.read().map_err(poisoned)?.rows.get(&id).cloned())
    }

    async fn create(&self, title: &str) -> Result<Todo, AppError> {
        Ok(self.inner.write().map_err(poisoned)?.insert(title))
    }

    async fn create_many(&self, titles: &[&str]) -> Result<u64, AppError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        for title in titles {
            inner.insert(title);
        }
        Ok(titles.len() as u64)
    }

    async fn update(&self, id: i64, title: &str) -> Result<Option<Todo>, AppError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        Ok(inner.rows.get_mut(&id).map(|t| {
            t.title = title.to_string();
            t.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>, AppError> {
        Ok(self.inner.write().map_err(poisoned)?.rows.remove(&id))
    }

    async fn delete_many(&self) -> Result<u64, AppError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let n = inner.rows.len() as u64;
        inner.rows.clear();
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_keep_increasing_after_delete() {
        let store = MemoryTodoStore::default();
        let a = store.create("a").await.unwrap();
        store.delete(a.id).await.unwrap();
        let b = store.create("b").await.unwrap();
        assert!(b.id > a.id);
        assert_eq!(store.find_many(0, 20).await.unwrap(), vec![b]);
    }

    #[tokio::test]
    async fn rejects_duplicate_users() {
        let store = MemoryUserStore::default();
        let user = NewUser {
            id: "u".into(),
            first_name: "A".into(),
            full_name: "A B".into(),
            email: "a@b.c".into(),
        };
        store.create(&user).await.unwrap();
        assert!(matches!(store.create(&user).await, Err(AppError::Conflict(_))));
    }
}
