//! Runtime object schemas over JSON values and the HTTP request-schema composer.

mod field;
mod http;
mod issue;
mod object;

pub use field::{FieldSchema, NumberRules, Pattern, StringRules};
pub use http::{
    http_schema, pagination_offset, pagination_query, pagination_size, HttpSchemaConfig, Page,
    PAGE_OFFSET_DEFAULT, PAGE_SIZE_DEFAULT, PAGE_SIZE_MAX,
};
pub use issue::{Issue, IssueKind, SchemaError};
pub use object::{ensure_object, ObjectLike, ObjectSchema, Shape};
