//! User handlers.

use crate::db::UserPatch;
use crate::error::AppError;
use crate::extractors::{Inject, RequestSchema, Validated};
use crate::response::{success_many, success_one_ok};
use crate::schema::{http_schema, FieldSchema, HttpSchemaConfig, ObjectSchema};
use crate::service::UserService;
use axum::{http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use std::sync::OnceLock;

pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

fn user_id_params() -> ObjectSchema {
    ObjectSchema::from_fields([("userId", FieldSchema::string().min_len(1))])
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdParams {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct UserById {
    pub params: UserIdParams,
}

impl RequestSchema for UserById {
    fn schema() -> &'static ObjectSchema {
        static SCHEMA: OnceLock<ObjectSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| http_schema(HttpSchemaConfig::new().params(user_id_params())))
    }
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub params: UserIdParams,
    pub body: UserPatch,
}

impl RequestSchema for UpdateUser {
    fn schema() -> &'static ObjectSchema {
        static SCHEMA: OnceLock<ObjectSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            http_schema(HttpSchemaConfig::new().params(user_id_params()).body([
                ("firstName", FieldSchema::string().min_len(1).optional()),
                ("fullName", FieldSchema::string().min_len(1).optional()),
                ("email", FieldSchema::string().pattern(EMAIL_PATTERN).optional()),
            ]))
        })
    }
}

pub async fn list_users(Inject(users): Inject<UserService>) -> Result<impl IntoResponse, AppError> {
    Ok(success_many(users.find_all().await?))
}

pub async fn get_user(
    Inject(users): Inject<UserService>,
    Validated(req): Validated<UserById>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(users.find_one(&req.params.user_id).await?))
}

pub async fn update_user(
    Inject(users): Inject<UserService>,
    Validated(req): Validated<UpdateUser>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(users.update(&req.params.user_id, &req.body).await?))
}

pub async fn delete_user(
    Inject(users): Inject<UserService>,
    Validated(req): Validated<UserById>,
) -> Result<impl IntoResponse, AppError> {
    users.remove(&req.params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
