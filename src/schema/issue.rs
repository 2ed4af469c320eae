//! Structured validation failures: one `Issue` per offending field.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// What went wrong with a single field.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueKind {
    Required,
    InvalidType {
        expected: &'static str,
        received: &'static str,
    },
    NotInteger,
    TooSmall { minimum: f64 },
    TooBig { maximum: f64 },
    TooShort { min_len: usize },
    TooLong { max_len: usize },
    PatternMismatch { pattern: String },
    InvalidDate,
    UnrecognizedKey { key: String },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Required => write!(f, "is required"),
            IssueKind::InvalidType { expected, received } => {
                write!(f, "expected {}, received {}", expected, received)
            }
            IssueKind::NotInteger => write!(f, "must be an integer"),
            IssueKind::TooSmall { minimum } => write!(f, "must be at least {}", minimum),
            IssueKind::TooBig { maximum } => write!(f, "must be at most {}", maximum),
            IssueKind::TooShort { min_len } => write!(f, "must be at least {} characters", min_len),
            IssueKind::TooLong { max_len } => write!(f, "must be at most {} characters", max_len),
            IssueKind::PatternMismatch { .. } => write!(f, "does not match required pattern"),
            IssueKind::InvalidDate => write!(f, "must be an ISO date, ISO datetime or epoch milliseconds"),
            IssueKind::UnrecognizedKey { key } => write!(f, "unrecognized key '{}'", key),
        }
    }
}

/// A field path plus the reason it was rejected. The root object has an empty path.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Issue {
    pub path: String,
    #[serde(flatten)]
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(path: &[String], kind: IssueKind) -> Self {
        let path = path.join(".");
        let message = if path.is_empty() {
            kind.to_string()
        } else {
            format!("{} {}", path, kind)
        };
        Issue { path, kind, message }
    }
}

/// Every issue found while validating one input value.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{} validation issue(s): {}", .issues.len(), summary(.issues))]
pub struct SchemaError {
    pub issues: Vec<Issue>,
}

impl SchemaError {
    /// Issues reported at exactly `path` (dotted).
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a IssueKind> + 'a {
        self.issues.iter().filter(move |i| i.path == path).map(|i| &i.kind)
    }

    pub fn to_details(&self) -> serde_json::Value {
        serde_json::to_value(&self.issues).unwrap_or(serde_json::Value::Null)
    }
}

fn summary(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
