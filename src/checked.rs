//! The chainable checked value.
//!
//! This module provides [`CheckedValue`], which wraps a subject with an
//! optional fallback and display name, and [`Outcome`], the result of one
//! `validate` call.
//!
//! # Example
//!
//! ```rust
//! use checkchain::Check;
//! use serde_json::json;
//!
//! let mut port = Check::value(json!(70000))
//!     .with_fallback(json!(8080))
//!     .named("port")
//!     .type_(["integer"])
//!     .range(1, 65535);
//!
//! let outcome = port.validate();
//! assert!(!outcome.is_valid);
//! assert_eq!(outcome.value, json!(8080));
//! assert_eq!(
//!     outcome.messages(),
//!     vec!["port: [range] must be between 1 and 65535 (expected: 1..=65535) (got: 70000)"]
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{CheckError, CheckErrors};
use crate::rule::{into_predicate, IntoVerdict, KeySchema, Pattern, Prototype, Rule, RuleKind};
use crate::value::Bound;

/// Label used in messages when a value has no display name.
pub const DEFAULT_LABEL: &str = "value";

/// A subject value with an attached set of rules.
///
/// At most one rule per [`RuleKind`] is kept: attaching a kind again
/// replaces its configuration. Rules are evaluated in [`RuleKind::ALL`]
/// order, not attachment order, and every attached rule is evaluated.
#[derive(Clone)]
pub struct CheckedValue {
    subject: Value,
    fallback: Option<Value>,
    name: Option<String>,
    rules: IndexMap<RuleKind, Rule>,
    last_errors: Vec<CheckError>,
}

impl CheckedValue {
    /// Creates a checked value with no rules, fallback or display name.
    pub fn new(subject: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            fallback: None,
            name: None,
            rules: IndexMap::new(),
            last_errors: Vec::new(),
        }
    }

    /// Creates a checked value from all construction parameters at once.
    pub fn make(subject: impl Into<Value>, fallback: Option<Value>, name: Option<String>) -> Self {
        Self {
            fallback,
            name,
            ..Self::new(subject)
        }
    }

    /// Sets the value returned in place of the subject when validation fails.
    pub fn with_fallback(mut self, fallback: impl Into<Value>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Sets the display name used in messages and as the aggregation key.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn attach(mut self, rule: Rule) -> Self {
        let kind = rule.kind();
        if self.rules.insert(kind, rule).is_some() {
            log::trace!("replaced {} rule on '{}'", kind, self.label());
        }
        self
    }

    /// Requires the subject's type tag to be one of `tags`.
    ///
    /// Recognised tags: `null`, `boolean`, `number`, `integer`, `string`,
    /// `array`, `object`.
    pub fn type_<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attach(Rule::Type(tags.into_iter().map(Into::into).collect()))
    }

    /// Requires a number to be at least `min`, or a string/array to have at
    /// least `min` elements.
    pub fn min(self, min: impl Bound) -> Self {
        self.attach(Rule::Min(min.into_bound()))
    }

    /// Requires a number to be at most `max`, or a string/array to have at
    /// most `max` elements.
    pub fn max(self, max: impl Bound) -> Self {
        self.attach(Rule::Max(max.into_bound()))
    }

    /// Requires both the Min and Max conditions, reported as one failure.
    pub fn range(self, min: impl Bound, max: impl Bound) -> Self {
        self.attach(Rule::Range(min.into_bound(), max.into_bound()))
    }

    /// Requires a string matching the regex `pattern`.
    ///
    /// An invalid regex does not fail here; the rule fails when validated.
    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.attach(Rule::Pattern(Pattern::new(pattern)))
    }

    /// Requires the subject to equal one of `values`.
    pub fn enum_<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.attach(Rule::Enum(values.into_iter().map(Into::into).collect()))
    }

    /// Requires `predicate` to accept the subject.
    ///
    /// An `Err` returned by the predicate, or a panic inside it, fails the
    /// rule instead of propagating.
    pub fn custom<F, R>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.attach(Rule::Custom {
            predicate: into_predicate(predicate),
            description: None,
        })
    }

    /// Like [`custom`](Self::custom), with a description used in the failure message.
    pub fn custom_described<F, R>(self, description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: IntoVerdict,
    {
        self.attach(Rule::Custom {
            predicate: into_predicate(predicate),
            description: Some(description.into()),
        })
    }

    /// Requires the subject to be an instance of `proto`.
    pub fn instance_of<P>(self, proto: P) -> Self
    where
        P: Prototype + 'static,
    {
        self.attach(Rule::InstanceOf(Arc::new(proto)))
    }

    /// Requires an object with a non-null value under `key`.
    pub fn has_key(self, key: impl Into<String>) -> Self {
        self.attach(Rule::HasKey(key.into()))
    }

    /// Requires an object with a non-null value under every key in `keys`.
    pub fn has_keys<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attach(Rule::HasKeys(keys.into_iter().map(Into::into).collect()))
    }

    /// Requires an object whose keys satisfy `schema`.
    pub fn schema(self, schema: KeySchema) -> Self {
        self.attach(Rule::Schema(schema))
    }

    /// Evaluates every attached rule and records the errors.
    ///
    /// Never fails: rule failures, misconfigured rules and predicate panics
    /// all surface as entries in [`Outcome::errors`].
    pub fn validate(&mut self) -> Outcome {
        let label = self.label().to_string();
        let errors: Vec<CheckError> = RuleKind::ALL
            .iter()
            .filter_map(|kind| self.rules.get(kind))
            .flat_map(|rule| rule.evaluate(&self.subject, &label))
            .collect();

        for error in &errors {
            log::trace!("{}", error);
        }
        log::debug!(
            "validated '{}': {} rule(s), {} error(s)",
            label,
            self.rules.len(),
            errors.len()
        );

        let is_valid = errors.is_empty();
        let value = match (&self.fallback, is_valid) {
            (Some(fallback), false) => fallback.clone(),
            _ => self.subject.clone(),
        };
        self.last_errors = errors.clone();

        Outcome {
            value,
            is_valid,
            errors,
        }
    }

    /// Errors recorded by the most recent `validate` call.
    pub fn get_errors(&self) -> &[CheckError] {
        &self.last_errors
    }

    /// The first error the given kind produced in the most recent `validate` call.
    pub fn error_for(&self, kind: RuleKind) -> Option<&CheckError> {
        self.last_errors.iter().find(|e| e.kind == kind)
    }

    pub fn subject(&self) -> &Value {
        &self.subject
    }

    pub fn fallback(&self) -> Option<&Value> {
        self.fallback.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The display name, or [`DEFAULT_LABEL`].
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub fn has_rule(&self, kind: RuleKind) -> bool {
        self.rules.contains_key(&kind)
    }

    /// Attached kinds, in the order they were first attached.
    pub fn rule_kinds(&self) -> impl Iterator<Item = RuleKind> + '_ {
        self.rules.keys().copied()
    }
}

impl fmt::Debug for CheckedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckedValue")
            .field("subject", &self.subject)
            .field("fallback", &self.fallback)
            .field("name", &self.name)
            .field("rules", &self.rules.values().collect::<Vec<_>>())
            .field("last_errors", &self.last_errors)
            .finish()
    }
}

/// The result of one `validate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The subject if valid; otherwise the fallback, or the subject if none was set.
    pub value: Value,
    pub is_valid: bool,
    /// Failures in rule evaluation order.
    pub errors: Vec<CheckError>,
}

impl Outcome {
    pub fn into_parts(self) -> (Value, bool, Vec<CheckError>) {
        (self.value, self.is_valid, self.errors)
    }

    /// The errors formatted as strings.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Converts into a stillwater `Validation`, dropping the fallback on failure.
    pub fn into_validation(self) -> Validation<Value, CheckErrors> {
        match CheckErrors::from_vec(self.errors) {
            None => Validation::Success(self.value),
            Some(errors) => Validation::Failure(errors),
        }
    }
}
