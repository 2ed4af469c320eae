//! Field-level validators and the parse walk shared by every schema.

use super::issue::{Issue, IssueKind};
use super::object::ObjectSchema;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use regex::Regex;
use serde_json::{Number, Value};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StringRules {
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub pattern: Option<Pattern>,
}

/// A string pattern, compiled when the schema is built. A pattern that fails to
/// compile matches nothing.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    regex: Option<Regex>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&source)?;
        Ok(Pattern {
            source,
            regex: Some(regex),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_compiled(&self) -> bool {
        self.regex.is_some()
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.regex.as_ref().map_or(false, |re| re.is_match(s))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NumberRules {
    /// Convert strings and booleans to numbers before any other check.
    pub coerce: bool,
    pub int: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Validator for a single field of an object schema.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldSchema {
    String(StringRules),
    Number(NumberRules),
    Boolean,
    /// ISO datetime, ISO date, or epoch milliseconds (coerced). Output is always a string.
    Date,
    Object(ObjectSchema),
    Optional(Box<FieldSchema>),
    Default(Box<FieldSchema>, Value),
}

impl FieldSchema {
    pub fn string() -> Self {
        FieldSchema::String(StringRules::default())
    }

    pub fn number() -> Self {
        FieldSchema::Number(NumberRules::default())
    }

    pub fn coerce_number() -> Self {
        FieldSchema::Number(NumberRules {
            coerce: true,
            ..NumberRules::default()
        })
    }

    pub fn boolean() -> Self {
        FieldSchema::Boolean
    }

    pub fn date() -> Self {
        FieldSchema::Date
    }

    pub fn object(schema: ObjectSchema) -> Self {
        FieldSchema::Object(schema)
    }

    pub fn optional(self) -> Self {
        FieldSchema::Optional(Box::new(self))
    }

    /// Value substituted when the key is absent. The default itself is not re-validated.
    pub fn with_default(self, value: impl Into<Value>) -> Self {
        FieldSchema::Default(Box::new(self), value.into())
    }

    pub fn int(self) -> Self {
        self.map_number(|r| r.int = true)
    }

    pub fn min(self, min: f64) -> Self {
        self.map_number(|r| r.min = Some(min))
    }

    pub fn max(self, max: f64) -> Self {
        self.map_number(|r| r.max = Some(max))
    }

    pub fn min_len(self, n: usize) -> Self {
        self.map_string(|r| r.min_len = Some(n))
    }

    pub fn max_len(self, n: usize) -> Self {
        self.map_string(|r| r.max_len = Some(n))
    }

    /// Require a regex match. Use `try_pattern` to get the compile error instead of a
    /// pattern that rejects every value.
    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let pattern = match Pattern::new(source.as_str()) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(pattern = %source, error = %e, "field pattern does not compile");
                Pattern { source, regex: None }
            }
        };
        self.map_string(move |r| r.pattern = Some(pattern))
    }

    pub fn try_pattern(self, pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = Pattern::new(pattern)?;
        Ok(self.map_string(move |r| r.pattern = Some(pattern)))
    }

    fn map_number(mut self, f: impl FnOnce(&mut NumberRules)) -> Self {
        if let FieldSchema::Number(ref mut rules) = self {
            f(rules);
        }
        self
    }

    fn map_string(mut self, f: impl FnOnce(&mut StringRules)) -> Self {
        if let FieldSchema::String(ref mut rules) = self {
            f(rules);
        }
        self
    }

    /// Validate `input` (`None` = key absent). Returns the output value, or `None`
    /// when the key should be omitted from the output or an issue was recorded.
    pub(crate) fn parse_at(
        &self,
        input: Option<&Value>,
        path: &mut Vec<String>,
        issues: &mut Vec<Issue>,
    ) -> Option<Value> {
        match self {
            FieldSchema::Optional(inner) => match input {
                None => None,
                Some(v) => inner.parse_at(Some(v), path, issues),
            },
            FieldSchema::Default(inner, default) => match input {
                None => Some(default.clone()),
                Some(v) => inner.parse_at(Some(v), path, issues),
            },
            _ => {
                let Some(value) = input else {
                    issues.push(Issue::new(path, IssueKind::Required));
                    return None;
                };
                let before = issues.len();
                let out = self.parse_present(value, path, issues);
                if issues.len() > before {
                    None
                } else {
                    out
                }
            }
        }
    }

    fn parse_present(&self, value: &Value, path: &mut Vec<String>, issues: &mut Vec<Issue>) -> Option<Value> {
        match self {
            FieldSchema::String(rules) => parse_string(value, rules, path, issues),
            FieldSchema::Number(rules) => parse_number(value, rules, path, issues),
            FieldSchema::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                other => {
                    issues.push(invalid_type(path, "boolean", other));
                    None
                }
            },
            FieldSchema::Date => parse_date(value, path, issues),
            FieldSchema::Object(schema) => schema.parse_at(value, path, issues),
            FieldSchema::Optional(_) | FieldSchema::Default(..) => self.parse_at(Some(value), path, issues),
        }
    }
}

pub(crate) fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn invalid_type(path: &[String], expected: &'static str, received: &Value) -> Issue {
    Issue::new(
        path,
        IssueKind::InvalidType {
            expected,
            received: type_name(received),
        },
    )
}

fn parse_string(value: &Value, rules: &StringRules, path: &[String], issues: &mut Vec<Issue>) -> Option<Value> {
    let Some(s) = value.as_str() else {
        issues.push(invalid_type(path, "string", value));
        return None;
    };
    let len = s.chars().count();
    if let Some(min_len) = rules.min_len {
        if len < min_len {
            issues.push(Issue::new(path, IssueKind::TooShort { min_len }));
        }
    }
    if let Some(max_len) = rules.max_len {
        if len > max_len {
            issues.push(Issue::new(path, IssueKind::TooLong { max_len }));
        }
    }
    if let Some(ref pattern) = rules.pattern {
        if !pattern.is_match(s) {
            issues.push(Issue::new(
                path,
                IssueKind::PatternMismatch {
                    pattern: pattern.as_str().to_string(),
                },
            ));
        }
    }
    Some(value.clone())
}

fn coerce_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                t.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn parse_number(value: &Value, rules: &NumberRules, path: &[String], issues: &mut Vec<Issue>) -> Option<Value> {
    let n = if rules.coerce {
        coerce_to_f64(value)
    } else {
        value.as_f64()
    };
    let Some(n) = n.filter(|n| n.is_finite()) else {
        issues.push(invalid_type(path, "number", value));
        return None;
    };
    if rules.int && n.fract() != 0.0 {
        issues.push(Issue::new(path, IssueKind::NotInteger));
        return None;
    }
    if let Some(minimum) = rules.min {
        if n < minimum {
            issues.push(Issue::new(path, IssueKind::TooSmall { minimum }));
        }
    }
    if let Some(maximum) = rules.max {
        if n > maximum {
            issues.push(Issue::new(path, IssueKind::TooBig { maximum }));
        }
    }
    // `i64::MAX as f64` rounds up to 2^63, which does not fit.
    if rules.int && n.abs() < i64::MAX as f64 {
        return Some(Value::Number((n as i64).into()));
    }
    Number::from_f64(n).map(Value::Number)
}

fn parse_date(value: &Value, path: &[String], issues: &mut Vec<Issue>) -> Option<Value> {
    let parsed = match value {
        Value::String(s) => {
            if DateTime::parse_from_rfc3339(s).is_ok() || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
                Some(value.clone())
            } else {
                s.trim().parse::<i64>().ok().and_then(epoch_millis)
            }
        }
        Value::Number(n) => n.as_i64().and_then(epoch_millis),
        other => {
            issues.push(invalid_type(path, "date", other));
            return None;
        }
    };
    if parsed.is_none() {
        issues.push(Issue::new(path, IssueKind::InvalidDate));
    }
    parsed
}

fn epoch_millis(ms: i64) -> Option<Value> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(schema: &FieldSchema, input: Option<Value>) -> (Option<Value>, Vec<Issue>) {
        let mut issues = Vec::new();
        let out = schema.parse_at(input.as_ref(), &mut vec!["f".into()], &mut issues);
        (out, issues)
    }

    #[test]
    fn coerces_numeric_strings() {
        let (out, issues) = run(&FieldSchema::coerce_number().int(), Some(json!(" 42 ")));
        assert!(issues.is_empty());
        assert_eq!(out, Some(json!(42)));
    }

    #[test]
    fn rejects_empty_and_null_when_coercing() {
        for input in [json!(""), json!(null), json!("abc")] {
            let (out, issues) = run(&FieldSchema::coerce_number(), Some(input));
            assert!(out.is_none());
            assert!(matches!(issues[0].kind, IssueKind::InvalidType { expected: "number", .. }));
        }
    }

    #[test]
    fn plain_number_does_not_coerce() {
        let (_, issues) = run(&FieldSchema::number(), Some(json!("1")));
        assert_eq!(
            issues[0].kind,
            IssueKind::InvalidType {
                expected: "number",
                received: "string"
            }
        );
    }

    #[test]
    fn int_rejects_fractions() {
        let (_, issues) = run(&FieldSchema::coerce_number().int(), Some(json!("1.5")));
        assert_eq!(issues[0].kind, IssueKind::NotInteger);
    }

    #[test]
    fn reports_both_bounds_independently() {
        let schema = FieldSchema::number().min(1.0).max(3.0);
        assert_eq!(run(&schema, Some(json!(0))).1[0].kind, IssueKind::TooSmall { minimum: 1.0 });
        assert_eq!(run(&schema, Some(json!(4))).1[0].kind, IssueKind::TooBig { maximum: 3.0 });
        assert_eq!(run(&schema, Some(json!(2.5))).0, Some(json!(2.5)));
    }

    #[test]
    fn string_rules() {
        let schema = FieldSchema::string().min_len(2).max_len(4).pattern("^[a-z]+$");
        assert!(run(&schema, Some(json!("abc"))).1.is_empty());
        let (out, issues) = run(&schema, Some(json!("ABCDEF")));
        assert!(out.is_none());
        assert_eq!(issues.len(), 2);
        assert_eq!(run(&schema, Some(json!("a"))).1[0].kind, IssueKind::TooShort { min_len: 2 });
    }

    #[test]
    fn patterns_compile_when_built() {
        assert!(FieldSchema::string().try_pattern("(").is_err());
        let FieldSchema::String(rules) = FieldSchema::string().pattern("^a") else {
            panic!("expected a string schema");
        };
        assert!(rules.pattern.as_ref().is_some_and(Pattern::is_compiled));

        let broken = FieldSchema::string().pattern("(");
        let (out, issues) = run(&broken, Some(json!("(")));
        assert!(out.is_none());
        assert_eq!(
            issues[0].kind,
            IssueKind::PatternMismatch {
                pattern: "(".into()
            }
        );
    }

    #[test]
    fn integers_beyond_i64_stay_exact() {
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        let (out, issues) = run(&FieldSchema::number().int(), Some(json!(two_pow_63)));
        assert!(issues.is_empty());
        assert_eq!(out.and_then(|v| v.as_f64()), Some(two_pow_63));

        let (out, _) = run(&FieldSchema::number().int(), Some(json!(9_007_199_254_740_992_i64)));
        assert_eq!(out, Some(json!(9_007_199_254_740_992_i64)));
    }

    #[test]
    fn optional_and_default_handle_absence() {
        assert_eq!(run(&FieldSchema::string().optional(), None), (None, vec![]));
        assert_eq!(
            run(&FieldSchema::number().with_default(7), None),
            (Some(json!(7)), vec![])
        );
        let (_, issues) = run(&FieldSchema::string(), None);
        assert_eq!(issues[0].kind, IssueKind::Required);
        assert_eq!(issues[0].path, "f");
    }

    #[test]
    fn dates() {
        assert!(run(&FieldSchema::date(), Some(json!("2024-05-01"))).1.is_empty());
        assert!(run(&FieldSchema::date(), Some(json!("2024-05-01T10:00:00Z"))).1.is_empty());
        assert_eq!(
            run(&FieldSchema::date(), Some(json!(0))).0,
            Some(json!("1970-01-01T00:00:00.000Z"))
        );
        assert_eq!(run(&FieldSchema::date(), Some(json!("yesterday"))).1[0].kind, IssueKind::InvalidDate);
    }

    #[test]
    fn boolean_is_strict() {
        assert_eq!(run(&FieldSchema::boolean(), Some(json!(true))).0, Some(json!(true)));
        assert!(!run(&FieldSchema::boolean(), Some(json!("true"))).1.is_empty());
    }
}
