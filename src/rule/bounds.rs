//! Min, Max and Range evaluation.
//!
//! Numbers are compared by value; strings and arrays by size.

use serde_json::Value;

use crate::error::{CheckError, ConfigError};
use crate::value::{Measure, TypeTag};

use super::{config_failure, RuleKind};

fn finite(bound: f64) -> Result<f64, ConfigError> {
    if bound.is_finite() {
        Ok(bound)
    } else {
        Err(ConfigError::NonFiniteBound(bound))
    }
}

/// `bound` is the rule's rendered bound, reported as `expected`.
fn measure(
    subject: &Value,
    label: &str,
    kind: RuleKind,
    bound: &str,
) -> Result<Measure, CheckError> {
    Measure::of(subject).ok_or_else(|| {
        CheckError::new(
            label,
            kind,
            "value has no numeric value or size (number, string or array required)",
        )
        .with_code("unmeasurable")
        .with_expected(bound)
        .with_got(TypeTag::of(subject).name())
    })
}

fn code(measure: Measure, value_code: &str, length_code: &str) -> String {
    match measure {
        Measure::Value(_) => value_code.to_string(),
        Measure::Length(_) => length_code.to_string(),
    }
}

pub(super) fn check_min(subject: &Value, label: &str, min: f64) -> Option<CheckError> {
    let min = match finite(min) {
        Ok(min) => min,
        Err(e) => return Some(config_failure(label, RuleKind::Min, e)),
    };
    let bound = format!(">= {}", min);
    let measured = match measure(subject, label, RuleKind::Min, &bound) {
        Ok(m) => m,
        Err(e) => return Some(e),
    };

    if measured.as_f64() >= min {
        return None;
    }
    Some(
        CheckError::new(
            label,
            RuleKind::Min,
            format!("{}must be at least {}", measured.subject(), min),
        )
        .with_code(code(measured, "min_value", "min_length"))
        .with_expected(bound)
        .with_got(measured.to_string()),
    )
}

pub(super) fn check_max(subject: &Value, label: &str, max: f64) -> Option<CheckError> {
    let max = match finite(max) {
        Ok(max) => max,
        Err(e) => return Some(config_failure(label, RuleKind::Max, e)),
    };
    let bound = format!("<= {}", max);
    let measured = match measure(subject, label, RuleKind::Max, &bound) {
        Ok(m) => m,
        Err(e) => return Some(e),
    };

    if measured.as_f64() <= max {
        return None;
    }
    Some(
        CheckError::new(
            label,
            RuleKind::Max,
            format!("{}must be at most {}", measured.subject(), max),
        )
        .with_code(code(measured, "max_value", "max_length"))
        .with_expected(bound)
        .with_got(measured.to_string()),
    )
}

/// Both bounds are checked together and reported as one failure.
pub(super) fn check_range(subject: &Value, label: &str, min: f64, max: f64) -> Option<CheckError> {
    let bounds = finite(min).and_then(|min| {
        let max = finite(max)?;
        if min > max {
            Err(ConfigError::InvertedRange { min, max })
        } else {
            Ok((min, max))
        }
    });
    let (min, max) = match bounds {
        Ok(bounds) => bounds,
        Err(e) => return Some(config_failure(label, RuleKind::Range, e)),
    };
    let bound = format!("{}..={}", min, max);
    let measured = match measure(subject, label, RuleKind::Range, &bound) {
        Ok(m) => m,
        Err(e) => return Some(e),
    };

    let v = measured.as_f64();
    if v >= min && v <= max {
        return None;
    }
    Some(
        CheckError::new(
            label,
            RuleKind::Range,
            format!("{}must be between {} and {}", measured.subject(), min, max),
        )
        .with_code(code(measured, "out_of_range", "length_out_of_range"))
        .with_expected(bound)
        .with_got(measured.to_string()),
    )
}
