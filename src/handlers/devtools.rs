//! Devtools panel handlers.

use crate::devtools::{classify_outdated, panel_config, OutdatedInfo, PackageManifest, StorePatch};
use crate::error::AppError;
use crate::extractors::{RequestSchema, Validated};
use crate::response::{success_many, success_one_ok};
use crate::schema::{http_schema, FieldSchema, HttpSchemaConfig, ObjectSchema};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

#[derive(Deserialize)]
pub struct PatchStore {
    pub body: StorePatch,
}

impl RequestSchema for PatchStore {
    fn schema() -> &'static ObjectSchema {
        static SCHEMA: OnceLock<ObjectSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            http_schema(HttpSchemaConfig::new().body([
                ("firstName", FieldSchema::string().optional()),
                ("lastName", FieldSchema::string().optional()),
            ]))
        })
    }
}

#[derive(Deserialize)]
pub struct OutdatedReport {
    #[serde(default)]
    pub outdated: BTreeMap<String, OutdatedInfo>,
}

pub async fn panel() -> impl IntoResponse {
    success_one_ok(panel_config())
}

pub async fn package() -> Result<impl IntoResponse, AppError> {
    Ok(success_one_ok(PackageManifest::current()?))
}

pub async fn outdated(
    payload: Result<Json<OutdatedReport>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(report) = payload.map_err(|e| match e {
        JsonRejection::JsonDataError(e) => AppError::Validation(e.body_text()),
        other => AppError::BadRequest(other.body_text()),
    })?;
    Ok(success_many(classify_outdated(report.outdated)))
}

pub async fn get_store(State(state): State<AppState>) -> impl IntoResponse {
    success_one_ok(state.devtools.snapshot())
}

pub async fn patch_store(
    State(state): State<AppState>,
    Validated(req): Validated<PatchStore>,
) -> impl IntoResponse {
    success_one_ok(state.devtools.update(req.body))
}
