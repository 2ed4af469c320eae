//! Todo handlers: list, create, read, rename, delete.

use crate::error::AppError;
use crate::extractors::{Inject, RequestSchema, Validated};
use crate::response::{success_one, success_one_ok, success_page};
use crate::schema::{http_schema, FieldSchema, HttpSchemaConfig, ObjectSchema, Page};
use crate::service::TodoService;
use axum::{http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use std::sync::OnceLock;

/// At least one non-whitespace character, since titles are stored trimmed.
fn title_field() -> FieldSchema {
    FieldSchema::string().min_len(1).max_len(200).pattern(r"\S")
}

fn id_params() -> ObjectSchema {
    ObjectSchema::from_fields([("id", FieldSchema::coerce_number().int().min(1.0))])
}

#[derive(Deserialize)]
pub struct TodoIdParams {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct TitleBody {
    pub title: String,
}

#[derive(Deserialize)]
pub struct ListTodos {
    pub page: Page,
}

impl RequestSchema for ListTodos {
    fn schema() -> &'static ObjectSchema {
        static SCHEMA: OnceLock<ObjectSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| http_schema(HttpSchemaConfig::new().paginated()))
    }
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub body: TitleBody,
}

impl RequestSchema for CreateTodo {
    fn schema() -> &'static ObjectSchema {
        static SCHEMA: OnceLock<ObjectSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| http_schema(HttpSchemaConfig::new().body([("title", title_field())])))
    }
}

#[derive(Deserialize)]
pub struct TodoById {
    pub params: TodoIdParams,
}

impl RequestSchema for TodoById {
    fn schema() -> &'static ObjectSchema {
        static SCHEMA: OnceLock<ObjectSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| http_schema(HttpSchemaConfig::new().params(id_params())))
    }
}

#[derive(Deserialize)]
pub struct RenameTodo {
    pub params: TodoIdParams,
    pub body: TitleBody,
}

impl RequestSchema for RenameTodo {
    fn schema() -> &'static ObjectSchema {
        static SCHEMA: OnceLock<ObjectSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            http_schema(
                HttpSchemaConfig::new()
                    .params(id_params())
                    .body([("title", title_field())]),
            )
        })
    }
}

pub async fn list_todos(
    Inject(todos): Inject<TodoService>,
    Validated(req): Validated<ListTodos>,
) -> Result<impl IntoResponse, AppError> {
    let (items, total) = todos.list(req.page).await?;
    Ok(success_page(items, req.page, total))
}

pub async fn create_todo(
    Inject(todos): Inject<TodoService>,
    Validated(req): Validated<CreateTodo>,
) -> Result<impl IntoResponse, AppError> {
    let todo = todos.create(&req.body.title).await?;
    Ok(success_one(todo))
}

pub async fn get_todo(
    Inject(todos): Inject<TodoService>,
    Validated(req): Validated<TodoById>,
) -> Result<impl IntoResponse, AppError> {
    let todo = todos.get(req.params.id).await?;
    Ok(success_one_ok(todo))
}

pub async fn rename_todo(
    Inject(todos): Inject<TodoService>,
    Validated(req): Validated<RenameTodo>,
) -> Result<impl IntoResponse, AppError> {
    let todo = todos.rename(req.params.id, &req.body.title).await?;
    Ok(success_one_ok(todo))
}

pub async fn delete_todo(
    Inject(todos): Inject<TodoService>,
    Validated(req): Validated<TodoById>,
) -> Result<impl IntoResponse, AppError> {
    todos.remove(req.params.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
