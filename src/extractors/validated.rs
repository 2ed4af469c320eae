//! Validate a request's body, path parameters and paging query against a composed schema.

use crate::error::AppError;
use crate::schema::ObjectSchema;
use async_trait::async_trait;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Largest request body read by `Validated`; matches the router's body limit.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// A typed request together with the schema it is validated against. The schema is
/// composed once and shared by every request to the route.
pub trait RequestSchema: DeserializeOwned {
    fn schema() -> &'static ObjectSchema;
}

/// Assembles the `{body?, params?, page?}` value a request schema validates.
/// Parts the request does not carry are left out entirely.
#[derive(Debug, Default)]
pub struct RequestInput {
    fields: Map<String, Value>,
}

impl RequestInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: Option<Value>) -> Self {
        if let Some(body) = body {
            self.fields.insert("body".into(), body);
        }
        self
    }

    pub fn params(mut self, params: HashMap<String, String>) -> Self {
        if !params.is_empty() {
            let params = params.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
            self.fields.insert("params".into(), Value::Object(params));
        }
        self
    }

    /// `skip` and `take` query values, kept as strings for the schema to coerce.
    pub fn page_query(mut self, query: &HashMap<String, String>) -> Self {
        let page: Map<String, Value> = ["skip", "take"]
            .into_iter()
            .filter_map(|k| query.get(k).map(|v| (k.to_string(), Value::String(v.clone()))))
            .collect();
        if !page.is_empty() {
            self.fields.insert("page".into(), Value::Object(page));
        }
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Extractor yielding `T` after schema validation. Failures become 422 with per-field issues.
pub struct Validated<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: RequestSchema + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let params = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, state).await {
            Ok(Path(params)) => params,
            Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
            Err(e) => return Err(AppError::BadRequest(format!("invalid path parameters: {}", e.body_text()))),
        };
        let Query(query) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(format!("invalid query string: {}", e)))?;
        let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| AppError::BadRequest(format!("unreadable body: {}", e)))?;
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            let v: Value = serde_json::from_slice(&bytes)
                .map_err(|e| AppError::BadRequest(format!("body must be JSON: {}", e)))?;
            Some(v)
        };

        let input = RequestInput::new()
            .body(body)
            .params(params)
            .page_query(&query)
            .into_value();
        let value = T::schema().parse_into::<T>(&input)?;
        Ok(Validated(value))
    }
}
