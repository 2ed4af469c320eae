//! Sign-in bookkeeping: map an external profile onto a local user.

use crate::db::{Database, NewUser};
use crate::error::AppError;
use crate::extractors::FromAppState;
use crate::service::UserService;
use crate::state::AppState;
use serde::{Deserialize, Serialize};

/// Profile returned by the external identity provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProfile {
    pub auth_sch_id: String,
    pub first_name: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
}

impl AuthService {
    pub fn new(users: UserService) -> Self {
        AuthService { users }
    }

    /// Id of the user matching `profile`, creating the user on first sign-in.
    pub async fn find_or_create_user(&self, profile: &AuthProfile) -> Result<String, AppError> {
        self.lookup_or_insert(profile).await.map_err(|e| {
            tracing::error!(auth_sch_id = %profile.auth_sch_id, error = %e, "user creation failed");
            AppError::Internal("unexpected error during user creation".into())
        })
    }

    async fn lookup_or_insert(&self, profile: &AuthProfile) -> Result<String, AppError> {
        if let Some(user) = self.users.find_by_auth_sch_id(&profile.auth_sch_id).await? {
            return Ok(user.id);
        }
        let created = self
            .users
            .create(&NewUser {
                id: profile.auth_sch_id.clone(),
                first_name: profile.first_name.clone(),
                full_name: profile.full_name.clone(),
                email: profile.email.clone(),
            })
            .await?;
        Ok(created.id)
    }
}

impl FromAppState for AuthService {
    fn from_app_state(state: &AppState, db: &Database) -> Self {
        AuthService::new(UserService::from_app_state(state, db))
    }
}
