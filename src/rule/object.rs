//! HasKey, HasKeys and Schema evaluation over structured subjects.
//!
//! A key mapped to `null` counts as absent for HasKey/HasKeys. Schema
//! predicates see absent keys as `None` and decide for themselves.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{CheckError, ConfigError};
use crate::value::describe;

use super::predicate::{guarded, into_key_predicate, IntoVerdict, KeyPredicate, Verdict};
use super::{config_failure, not_an_object, RuleKind};

/// A mapping from key name to a predicate on that key's value.
///
/// Keys are checked in insertion order. Adding a key twice replaces its
/// predicate.
///
/// # Example
///
/// ```rust
/// use checkchain::{Check, KeySchema};
/// use serde_json::{json, Value};
///
/// let schema = KeySchema::new()
///     .key("id", |v: Option<&Value>| {
///         v.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
///     })
///     .key("level", |v: Option<&Value>| {
///         v.and_then(Value::as_f64).is_some_and(|n| n > 0.0)
///     });
///
/// let mut ok = Check::value(json!({"id": "abc", "level": 5})).schema(schema.clone());
/// assert!(ok.validate().is_valid);
///
/// let mut bad = Check::value(json!({"id": "", "level": 5})).schema(schema);
/// let outcome = bad.validate();
/// assert_eq!(outcome.errors.len(), 1);
/// assert_eq!(outcome.errors[0].key.as_deref(), Some("id"));
/// ```
#[derive(Clone, Default)]
pub struct KeySchema {
    keys: IndexMap<String, KeyPredicate>,
}

impl KeySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the predicate for `name`.
    pub fn key<F, R>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(Option<&Value>) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.keys.insert(name.into(), into_key_predicate(predicate));
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

impl fmt::Debug for KeySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

fn present(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).is_some_and(|v| !v.is_null())
}

fn object_with_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> String {
    let keys: Vec<&str> = keys.into_iter().collect();
    match keys.as_slice() {
        [] => "object".to_string(),
        [key] => format!("object with key '{}'", key),
        _ => format!("object with keys [{}]", keys.join(", ")),
    }
}

fn missing_key(label: &str, kind: RuleKind, key: &str) -> CheckError {
    CheckError::new(label, kind, format!("missing key '{}'", key))
        .with_code("missing_key")
        .with_key(key)
}

pub(super) fn check_has_key(subject: &Value, label: &str, key: &str) -> Option<CheckError> {
    let Some(obj) = subject.as_object() else {
        return Some(not_an_object(
            subject,
            label,
            RuleKind::HasKey,
            object_with_keys([key]),
        ));
    };
    if present(obj, key) {
        None
    } else {
        Some(missing_key(label, RuleKind::HasKey, key))
    }
}

/// Reports the first missing key in configured order.
pub(super) fn check_has_keys(subject: &Value, label: &str, keys: &[String]) -> Option<CheckError> {
    if keys.is_empty() {
        return Some(config_failure(label, RuleKind::HasKeys, ConfigError::EmptyKeySet));
    }
    let Some(obj) = subject.as_object() else {
        return Some(not_an_object(
            subject,
            label,
            RuleKind::HasKeys,
            object_with_keys(keys.iter().map(String::as_str)),
        ));
    };

    keys.iter().find(|key| !present(obj, key)).map(|key| {
        missing_key(label, RuleKind::HasKeys, key)
            .with_expected(format!("keys [{}]", keys.join(", ")))
    })
}

/// Runs every key predicate and reports one error per rejected key.
pub(super) fn check_schema(subject: &Value, label: &str, schema: &KeySchema) -> Vec<CheckError> {
    let Some(obj) = subject.as_object() else {
        return vec![not_an_object(
            subject,
            label,
            RuleKind::Schema,
            object_with_keys(schema.keys()),
        )];
    };

    let mut errors = Vec::new();
    for (key, predicate) in &schema.keys {
        let value = obj.get(key);
        match guarded(|| predicate(value)) {
            Verdict::Pass => {}
            Verdict::Fail => errors.push(
                CheckError::new(label, RuleKind::Schema, "rejected by key predicate")
                    .with_code("schema")
                    .with_key(key)
                    .with_got(value.map(describe).unwrap_or_else(|| "absent".to_string())),
            ),
            Verdict::Error(reason) => errors.push(
                CheckError::new(
                    label,
                    RuleKind::Schema,
                    format!("key predicate failed: {}", reason),
                )
                .with_code("predicate_error")
                .with_key(key),
            ),
        }
    }
    errors
}
