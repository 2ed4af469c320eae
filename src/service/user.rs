//! User lookups and mutations.

use crate::db::{Database, NewUser, User, UserPatch};
use crate::error::AppError;
use crate::extractors::FromAppState;
use crate::state::AppState;

#[derive(Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        UserService { db }
    }

    /// Users are keyed by the id issued by the external auth provider.
    pub async fn find_by_auth_sch_id(&self, auth_sch_id: &str) -> Result<Option<User>, AppError> {
        self.db.user.find_unique(auth_sch_id).await
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let created = self.db.user.create(user).await?;
        tracing::info!(user_id = %created.id, "user created");
        Ok(created)
    }

    pub async fn find_all(&self) -> Result<Vec<User>, AppError> {
        self.db.user.find_many().await
    }

    pub async fn find_one(&self, id: &str) -> Result<User, AppError> {
        self.db
            .user
            .find_unique(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    pub async fn update(&self, id: &str, patch: &UserPatch) -> Result<User, AppError> {
        if patch.is_empty() {
            return self.find_one(id).await;
        }
        self.db
            .user
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    pub async fn remove(&self, id: &str) -> Result<User, AppError> {
        let removed = self
            .db
            .user
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;
        tracing::info!(user_id = %removed.id, "user removed");
        Ok(removed)
    }
}

impl FromAppState for UserService {
    fn from_app_state(_state: &AppState, db: &Database) -> Self {
        UserService::new(db.clone())
    }
}
