//! Request schema composition: `{body?, params?, page?}` from independent fragments.

use super::field::FieldSchema;
use super::object::{ensure_object, ObjectLike, ObjectSchema};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const PAGE_OFFSET_DEFAULT: u64 = 0;
pub const PAGE_SIZE_DEFAULT: u32 = 20;
pub const PAGE_SIZE_MAX: u32 = 100;

/// Offset: coerced integer, at least 0.
pub fn pagination_offset() -> FieldSchema {
    FieldSchema::coerce_number().int().min(0.0)
}

/// Page size: coerced integer in 1..=100.
pub fn pagination_size() -> FieldSchema {
    FieldSchema::coerce_number().int().min(1.0).max(PAGE_SIZE_MAX as f64)
}

/// The fixed pagination descriptor. A missing `page` becomes `{skip: 0, take: 20}`;
/// inside a present `page`, each missing field falls back to its own default.
pub fn pagination_query() -> FieldSchema {
    FieldSchema::object(ObjectSchema::from_fields([
        ("skip", pagination_offset().with_default(PAGE_OFFSET_DEFAULT)),
        ("take", pagination_size().with_default(PAGE_SIZE_DEFAULT)),
    ]))
    .with_default(json!({ "skip": PAGE_OFFSET_DEFAULT, "take": PAGE_SIZE_DEFAULT }))
}

/// Validated pagination window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub skip: u64,
    pub take: u32,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            skip: PAGE_OFFSET_DEFAULT,
            take: PAGE_SIZE_DEFAULT,
        }
    }
}

/// Which parts of a request an endpoint validates.
#[derive(Clone, Debug, Default)]
pub struct HttpSchemaConfig {
    pub body: Option<ObjectLike>,
    pub params: Option<ObjectLike>,
    pub pagination: bool,
}

impl HttpSchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: impl Into<ObjectLike>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn params(mut self, params: impl Into<ObjectLike>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn paginated(mut self) -> Self {
        self.pagination = true;
        self
    }
}

/// Compose the request schema. Parts that were not requested are absent from the
/// result, so inputs carrying them are rejected as unrecognized keys.
pub fn http_schema(config: HttpSchemaConfig) -> ObjectSchema {
    let HttpSchemaConfig {
        body,
        params,
        pagination,
    } = config;
    let mut fields = Vec::with_capacity(3);
    if let Some(body) = ensure_object(body) {
        fields.push(("body", FieldSchema::object(body)));
    }
    if let Some(params) = ensure_object(params) {
        fields.push(("params", FieldSchema::object(params)));
    }
    if pagination {
        fields.push(("page", pagination_query()));
    }
    ObjectSchema::from_fields(fields)
}
