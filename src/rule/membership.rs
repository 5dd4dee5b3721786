//! Type and Enum evaluation.

use serde_json::Value;

use crate::error::{CheckError, ConfigError};
use crate::value::{describe, loose_eq, TypeTag};

use super::{config_failure, RuleKind};

/// Passes if the subject carries any of the configured tags.
pub(super) fn check_type(subject: &Value, label: &str, tags: &[String]) -> Option<CheckError> {
    if tags.is_empty() {
        return Some(config_failure(label, RuleKind::Type, ConfigError::EmptyTypeSet));
    }
    let parsed: Result<Vec<TypeTag>, ConfigError> = tags.iter().map(|t| t.parse()).collect();
    let allowed = match parsed {
        Ok(allowed) => allowed,
        Err(e) => return Some(config_failure(label, RuleKind::Type, e)),
    };

    if allowed.iter().any(|tag| tag.matches(subject)) {
        return None;
    }
    let expected = tags.join(" | ");
    Some(
        CheckError::new(label, RuleKind::Type, format!("expected type {}", expected))
            .with_code("invalid_type")
            .with_expected(expected)
            .with_got(TypeTag::of(subject).name()),
    )
}

pub(super) fn check_enum(subject: &Value, label: &str, allowed: &[Value]) -> Option<CheckError> {
    if allowed.is_empty() {
        return Some(config_failure(label, RuleKind::Enum, ConfigError::EmptyEnum));
    }
    if allowed.iter().any(|candidate| loose_eq(candidate, subject)) {
        return None;
    }
    let expected = allowed
        .iter()
        .map(describe)
        .collect::<Vec<_>>()
        .join(", ");
    Some(
        CheckError::new(
            label,
            RuleKind::Enum,
            format!("must be one of [{}]", expected),
        )
        .with_code("not_in_enum")
        .with_expected(format!("one of [{}]", expected))
        .with_got(describe(subject)),
    )
}
