//! Pattern evaluation.

use regex::Regex;
use serde_json::Value;

use crate::error::{CheckError, ConfigError};
use crate::value::TypeTag;

use super::{config_failure, RuleKind};

/// A regex pattern compiled when attached.
///
/// A pattern that fails to compile is kept and reported on evaluation.
#[derive(Clone)]
pub(crate) struct Pattern {
    source: String,
    compiled: Result<Regex, regex::Error>,
}

impl Pattern {
    pub(crate) fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&source);
        Self { source, compiled }
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }
}

/// Non-string subjects fail regardless of the pattern.
pub(super) fn check_pattern(subject: &Value, label: &str, pattern: &Pattern) -> Option<CheckError> {
    let regex = match &pattern.compiled {
        Ok(regex) => regex,
        Err(e) => {
            let error = ConfigError::InvalidPattern {
                pattern: pattern.source.clone(),
                reason: e.to_string(),
            };
            return Some(config_failure(label, RuleKind::Pattern, error));
        }
    };

    let Some(s) = subject.as_str() else {
        return Some(
            CheckError::new(label, RuleKind::Pattern, "expected string")
                .with_code("invalid_type")
                .with_expected(format!("string matching '{}'", pattern.source))
                .with_got(TypeTag::of(subject).name()),
        );
    };

    if regex.is_match(s) {
        return None;
    }
    Some(
        CheckError::new(
            label,
            RuleKind::Pattern,
            format!("must match pattern '{}'", pattern.source),
        )
        .with_code("pattern")
        .with_got(s),
    )
}
