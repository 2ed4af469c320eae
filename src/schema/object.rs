//! Object schemas and normalization of shape-or-schema inputs.

use super::field::{invalid_type, FieldSchema};
use super::issue::{Issue, IssueKind, SchemaError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Raw mapping from field name to field validator.
pub type Shape = BTreeMap<String, FieldSchema>;

/// A composed object schema. Unknown keys are rejected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectSchema {
    shape: Shape,
}

impl ObjectSchema {
    pub fn new(shape: Shape) -> Self {
        ObjectSchema { shape }
    }

    pub fn from_fields<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldSchema)>,
    {
        ObjectSchema {
            shape: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.shape.get(name)
    }

    /// Field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.shape.keys().map(String::as_str)
    }

    /// Validate `input`, returning a value that holds only the declared fields.
    pub fn parse(&self, input: &Value) -> Result<Value, SchemaError> {
        let mut issues = Vec::new();
        let out = self.parse_at(input, &mut Vec::new(), &mut issues);
        match out {
            Some(v) if issues.is_empty() => Ok(v),
            _ => Err(SchemaError { issues }),
        }
    }

    /// `parse`, then deserialize the validated value into `T`.
    pub fn parse_into<T: DeserializeOwned>(&self, input: &Value) -> Result<T, SchemaError> {
        let value = self.parse(input)?;
        serde_path_to_error::deserialize(value).map_err(|e| {
            let path: Vec<String> = e.path().iter().map(ToString::to_string).collect();
            SchemaError {
                issues: vec![Issue::new(
                    &path,
                    IssueKind::InvalidType {
                        expected: "typed request",
                        received: serde_category(e.inner()),
                    },
                )],
            }
        })
    }

    pub(crate) fn parse_at(&self, input: &Value, path: &mut Vec<String>, issues: &mut Vec<Issue>) -> Option<Value> {
        let Value::Object(obj) = input else {
            issues.push(invalid_type(path, "object", input));
            return None;
        };
        let mut out = Map::new();
        for (name, field) in &self.shape {
            path.push(name.clone());
            if let Some(v) = field.parse_at(obj.get(name), path, issues) {
                out.insert(name.clone(), v);
            }
            path.pop();
        }
        for key in obj.keys().filter(|k| !self.shape.contains_key(*k)) {
            issues.push(Issue::new(path, IssueKind::UnrecognizedKey { key: key.clone() }));
        }
        Some(Value::Object(out))
    }
}

fn serde_category(e: &serde_json::Error) -> &'static str {
    match e.classify() {
        serde_json::error::Category::Data => "mismatched data",
        _ => "malformed value",
    }
}

/// Either an already composed schema or a raw shape still to be wrapped.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectLike {
    Schema(ObjectSchema),
    Shape(Shape),
}

impl From<ObjectSchema> for ObjectLike {
    fn from(schema: ObjectSchema) -> Self {
        ObjectLike::Schema(schema)
    }
}

impl From<Shape> for ObjectLike {
    fn from(shape: Shape) -> Self {
        ObjectLike::Shape(shape)
    }
}

impl<K: Into<String>, const N: usize> From<[(K, FieldSchema); N]> for ObjectLike {
    fn from(fields: [(K, FieldSchema); N]) -> Self {
        ObjectLike::Shape(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<ObjectLike> for ObjectSchema {
    fn from(input: ObjectLike) -> Self {
        match input {
            ObjectLike::Schema(schema) => schema,
            ObjectLike::Shape(shape) => ObjectSchema::new(shape),
        }
    }
}

/// Normalize a shape-or-schema. Absent stays absent; a schema passes through as is;
/// a shape is wrapped into a schema with exactly those fields.
pub fn ensure_object(input: Option<ObjectLike>) -> Option<ObjectSchema> {
    input.map(ObjectSchema::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_shape() -> Shape {
        Shape::from([
            ("name".to_string(), FieldSchema::string()),
            ("age".to_string(), FieldSchema::number()),
        ])
    }

    #[test]
    fn schema_passes_through_unchanged() {
        let schema = ObjectSchema::new(raw_shape());
        let out = ensure_object(Some(schema.clone().into())).unwrap();
        assert_eq!(out, schema);
        assert_eq!(out.shape(), &raw_shape());
    }

    #[test]
    fn shape_is_wrapped() {
        let out = ensure_object(Some(raw_shape().into())).unwrap();
        assert_eq!(out.shape(), &raw_shape());
    }

    #[test]
    fn shape_and_schema_normalize_equally() {
        let from_shape = ensure_object(Some(ObjectLike::from([("name", FieldSchema::string())])));
        let from_schema = ensure_object(Some(
            ObjectSchema::from_fields([("name", FieldSchema::string())]).into(),
        ));
        assert_eq!(from_shape, from_schema);
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let once = ensure_object(Some(raw_shape().into())).unwrap();
        let twice = ensure_object(Some(once.clone().into())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn absent_stays_absent() {
        assert_eq!(ensure_object(None), None);
    }

    #[test]
    fn parse_collects_every_issue() {
        let schema = ObjectSchema::new(raw_shape());
        let err = schema.parse(&json!({ "age": "x", "extra": true })).unwrap_err();
        assert_eq!(err.at("name").next(), Some(&IssueKind::Required));
        assert!(matches!(err.at("age").next(), Some(IssueKind::InvalidType { .. })));
        assert_eq!(
            err.at("").next(),
            Some(&IssueKind::UnrecognizedKey { key: "extra".into() })
        );
    }

    #[test]
    fn parse_rejects_non_objects() {
        let err = ObjectSchema::default().parse(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err.issues[0].kind,
            IssueKind::InvalidType {
                expected: "object",
                received: "array"
            }
        );
    }

    #[test]
    fn nested_paths_are_dotted() {
        let schema = ObjectSchema::from_fields([(
            "body",
            FieldSchema::object(ObjectSchema::from_fields([("title", FieldSchema::string())])),
        )]);
        let err = schema.parse(&json!({ "body": { "title": 3 } })).unwrap_err();
        assert_eq!(err.issues[0].path, "body.title");
    }
}
