//! Rule kinds and their evaluation.
//!
//! A [`Rule`] is one configured check. Each [`RuleKind`] maps to a single
//! evaluation function, and kinds are always evaluated in [`RuleKind::ALL`]
//! order regardless of the order they were attached in.

mod bounds;
mod membership;
mod object;
mod predicate;
mod prototype;
mod text;

use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;

use crate::error::{CheckError, ConfigError};

pub use object::KeySchema;
pub use predicate::{IntoVerdict, Verdict};
pub use prototype::{ClassRef, Prototype};

pub(crate) use predicate::into_predicate;
use predicate::Predicate;
pub(crate) use text::Pattern;

/// The fixed category of a rule.
///
/// The declaration order is the evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    Type,
    Min,
    Max,
    Range,
    Pattern,
    Enum,
    Custom,
    InstanceOf,
    HasKey,
    HasKeys,
    Schema,
}

impl RuleKind {
    /// Every kind, in evaluation order.
    pub const ALL: [RuleKind; 11] = [
        RuleKind::Type,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Range,
        RuleKind::Pattern,
        RuleKind::Enum,
        RuleKind::Custom,
        RuleKind::InstanceOf,
        RuleKind::HasKey,
        RuleKind::HasKeys,
        RuleKind::Schema,
    ];

    /// Returns the kind's name as used in messages and default error codes.
    pub fn name(self) -> &'static str {
        match self {
            RuleKind::Type => "type",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Range => "range",
            RuleKind::Pattern => "pattern",
            RuleKind::Enum => "enum",
            RuleKind::Custom => "custom",
            RuleKind::InstanceOf => "instance_of",
            RuleKind::HasKey => "has_key",
            RuleKind::HasKeys => "has_keys",
            RuleKind::Schema => "schema",
        }
    }
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single configured check.
#[derive(Clone)]
pub(crate) enum Rule {
    Type(Vec<String>),
    Min(f64),
    Max(f64),
    Range(f64, f64),
    Pattern(Pattern),
    Enum(Vec<Value>),
    Custom {
        predicate: Predicate,
        description: Option<String>,
    },
    InstanceOf(Arc<dyn Prototype>),
    HasKey(String),
    HasKeys(Vec<String>),
    Schema(KeySchema),
}

impl Rule {
    pub(crate) fn kind(&self) -> RuleKind {
        match self {
            Rule::Type(_) => RuleKind::Type,
            Rule::Min(_) => RuleKind::Min,
            Rule::Max(_) => RuleKind::Max,
            Rule::Range(..) => RuleKind::Range,
            Rule::Pattern(_) => RuleKind::Pattern,
            Rule::Enum(_) => RuleKind::Enum,
            Rule::Custom { .. } => RuleKind::Custom,
            Rule::InstanceOf(_) => RuleKind::InstanceOf,
            Rule::HasKey(_) => RuleKind::HasKey,
            Rule::HasKeys(_) => RuleKind::HasKeys,
            Rule::Schema(_) => RuleKind::Schema,
        }
    }

    /// Evaluates the rule against `subject`. An empty result means it passed.
    pub(crate) fn evaluate(&self, subject: &Value, label: &str) -> Vec<CheckError> {
        let single = match self {
            Rule::Type(tags) => membership::check_type(subject, label, tags),
            Rule::Min(min) => bounds::check_min(subject, label, *min),
            Rule::Max(max) => bounds::check_max(subject, label, *max),
            Rule::Range(min, max) => bounds::check_range(subject, label, *min, *max),
            Rule::Pattern(pattern) => text::check_pattern(subject, label, pattern),
            Rule::Enum(allowed) => membership::check_enum(subject, label, allowed),
            Rule::Custom {
                predicate: pred,
                description,
            } => predicate::check_custom(subject, label, pred, description.as_deref()),
            Rule::InstanceOf(proto) => prototype::check_instance_of(subject, label, proto.as_ref()),
            Rule::HasKey(key) => object::check_has_key(subject, label, key),
            Rule::HasKeys(keys) => object::check_has_keys(subject, label, keys),
            Rule::Schema(schema) => return object::check_schema(subject, label, schema),
        };
        single.into_iter().collect()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Type(tags) => f.debug_tuple("Type").field(tags).finish(),
            Rule::Min(min) => f.debug_tuple("Min").field(min).finish(),
            Rule::Max(max) => f.debug_tuple("Max").field(max).finish(),
            Rule::Range(min, max) => f.debug_tuple("Range").field(min).field(max).finish(),
            Rule::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.source()).finish(),
            Rule::Enum(allowed) => f.debug_tuple("Enum").field(allowed).finish(),
            Rule::Custom { description, .. } => f
                .debug_struct("Custom")
                .field("description", description)
                .finish_non_exhaustive(),
            Rule::InstanceOf(proto) => f
                .debug_tuple("InstanceOf")
                .field(&prototype::name_of(proto.as_ref()))
                .finish(),
            Rule::HasKey(key) => f.debug_tuple("HasKey").field(key).finish(),
            Rule::HasKeys(keys) => f.debug_tuple("HasKeys").field(keys).finish(),
            Rule::Schema(schema) => f.debug_tuple("Schema").field(schema).finish(),
        }
    }
}

/// Builds the failure reported for a rule that cannot be evaluated.
fn config_failure(label: &str, kind: RuleKind, error: ConfigError) -> CheckError {
    log::warn!("{} rule on '{}' is misconfigured: {}", kind, label, error);
    CheckError::new(label, kind, format!("invalid configuration: {}", error))
        .with_code("invalid_config")
}

/// Builds the failure reported when the subject is not an object.
///
/// `expected` names the keys the rule was configured with.
fn not_an_object(subject: &Value, label: &str, kind: RuleKind, expected: String) -> CheckError {
    CheckError::new(label, kind, "expected object")
        .with_code("invalid_type")
        .with_expected(expected)
        .with_got(crate::value::TypeTag::of(subject).name())
}
