//! Scope guard middleware and the identity providers it consults.

use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;

/// The caller of a request as seen by the guard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Identity {
    pub id: String,
    pub scopes: Vec<String>,
}

impl Identity {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Identify the caller of the request described by `parts`. `required` are the
    /// scopes the route asks for.
    async fn identify(&self, parts: &Parts, required: &[String]) -> Result<Identity, AppError>;
}

/// Stand-in for real authentication: every caller is `mock-user-id` holding exactly the
/// scopes the route requires.
pub struct StubIdentityProvider;

pub const STUB_USER_ID: &str = "mock-user-id";

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn identify(&self, _parts: &Parts, required: &[String]) -> Result<Identity, AppError> {
        Ok(Identity {
            id: STUB_USER_ID.into(),
            scopes: required.to_vec(),
        })
    }
}

/// Always answers with the same identity, whatever the route requires.
pub struct FixedIdentityProvider(pub Identity);

#[async_trait]
impl IdentityProvider for FixedIdentityProvider {
    async fn identify(&self, _parts: &Parts, _required: &[String]) -> Result<Identity, AppError> {
        Ok(self.0.clone())
    }
}

/// Middleware state: the scopes a group of routes requires.
#[derive(Clone)]
pub struct ScopeGuard {
    required: Arc<[String]>,
    state: AppState,
}

impl ScopeGuard {
    pub fn new<I, S>(state: AppState, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScopeGuard {
            required: scopes.into_iter().map(Into::into).collect(),
            state,
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }
}

/// Rejects the request with 403 unless the caller holds every required scope. On success
/// the `Identity` and a request-scoped `Database` are placed in request extensions.
pub async fn scope_guard(
    State(guard): State<ScopeGuard>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    let identity = guard.state.identity.identify(&parts, &guard.required).await?;
    if let Some(missing) = guard.required.iter().find(|s| !identity.has_scope(s)) {
        tracing::warn!(user_id = %identity.id, scope = %missing, uri = %parts.uri, "missing scope");
        return Err(AppError::Forbidden("insufficient scopes".into()));
    }
    tracing::debug!(user_id = %identity.id, "scopes granted");
    parts.extensions.insert(identity);
    parts.extensions.insert(guard.state.db.clone());
    Ok(next.run(Request::from_parts(parts, body)).await)
}
