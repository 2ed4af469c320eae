//! Sign-in callback and the current identity.

use crate::error::AppError;
use crate::extractors::{CurrentUser, Inject, RequestSchema, Validated};
use crate::response::success_one_ok;
use crate::schema::{http_schema, FieldSchema, HttpSchemaConfig, ObjectSchema};
use crate::service::{AuthProfile, AuthService};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::user::EMAIL_PATTERN;

#[derive(Deserialize)]
pub struct AuthCallback {
    pub body: AuthProfile,
}

impl RequestSchema for AuthCallback {
    fn schema() -> &'static ObjectSchema {
        static SCHEMA: OnceLock<ObjectSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            http_schema(HttpSchemaConfig::new().body([
                ("authSchId", FieldSchema::string().min_len(1)),
                ("firstName", FieldSchema::string()),
                ("fullName", FieldSchema::string()),
                ("email", FieldSchema::string().pattern(EMAIL_PATTERN)),
            ]))
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignedIn {
    user_id: String,
}

pub async fn callback(
    Inject(auth): Inject<AuthService>,
    Validated(req): Validated<AuthCallback>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = auth.find_or_create_user(&req.body).await?;
    Ok(success_one_ok(SignedIn { user_id }))
}

pub async fn me(CurrentUser(identity): CurrentUser) -> impl IntoResponse {
    success_one_ok(identity)
}
