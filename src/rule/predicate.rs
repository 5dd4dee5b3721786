//! Caller-supplied predicates and Custom evaluation.
//!
//! Predicates may return `bool` or `Result<bool, E>`. An `Err` or a panic
//! inside a predicate never escapes evaluation; it becomes a failed check.

use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::error::CheckError;
use crate::value::describe;

use super::RuleKind;

pub(crate) type Predicate = Arc<dyn Fn(&Value) -> Verdict + Send + Sync>;
pub(crate) type KeyPredicate = Arc<dyn Fn(Option<&Value>) -> Verdict + Send + Sync>;

/// The outcome of running a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
    /// The predicate could not reach a decision.
    Error(String),
}

/// Conversion from a predicate's return value into a [`Verdict`].
///
/// # Example
///
/// ```rust
/// use checkchain::Check;
/// use serde_json::{json, Value};
///
/// let mut port = Check::value(json!("8080")).custom(|v: &Value| {
///     v.as_str()
///         .ok_or("not a string")?
///         .parse::<u16>()
///         .map(|p| p >= 1024)
///         .map_err(|e| e.to_string())
/// });
///
/// assert!(port.validate().is_valid);
/// ```
pub trait IntoVerdict {
    fn into_verdict(self) -> Verdict;
}

impl IntoVerdict for Verdict {
    fn into_verdict(self) -> Verdict {
        self
    }
}

impl IntoVerdict for bool {
    fn into_verdict(self) -> Verdict {
        if self {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl<E: Display> IntoVerdict for Result<bool, E> {
    fn into_verdict(self) -> Verdict {
        match self {
            Ok(passed) => passed.into_verdict(),
            Err(e) => Verdict::Error(e.to_string()),
        }
    }
}

pub(crate) fn into_predicate<F, R>(f: F) -> Predicate
where
    F: Fn(&Value) -> R + Send + Sync + 'static,
    R: IntoVerdict,
{
    Arc::new(move |value: &Value| f(value).into_verdict())
}

pub(crate) fn into_key_predicate<F, R>(f: F) -> KeyPredicate
where
    F: Fn(Option<&Value>) -> R + Send + Sync + 'static,
    R: IntoVerdict,
{
    Arc::new(move |value: Option<&Value>| f(value).into_verdict())
}

/// Runs `f`, turning a panic into [`Verdict::Error`].
pub(crate) fn guarded<F>(f: F) -> Verdict
where
    F: FnOnce() -> Verdict,
{
    caught(f).unwrap_or_else(|message| Verdict::Error(format!("panicked: {}", message)))
}

/// Runs caller code, returning the panic message if it panicked.
pub(crate) fn caught<T, F>(f: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        log::warn!("caller code panicked: {}", message);
        message
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub(super) fn check_custom(
    subject: &Value,
    label: &str,
    predicate: &Predicate,
    description: Option<&str>,
) -> Option<CheckError> {
    match guarded(|| predicate(subject)) {
        Verdict::Pass => None,
        Verdict::Fail => {
            let message = match description {
                Some(d) => format!("must satisfy {}", d),
                None => "rejected by custom predicate".to_string(),
            };
            Some(
                CheckError::new(label, RuleKind::Custom, message)
                    .with_code("custom")
                    .with_got(describe(subject)),
            )
        }
        Verdict::Error(reason) => Some(
            CheckError::new(
                label,
                RuleKind::Custom,
                format!("predicate failed: {}", reason),
            )
            .with_code("predicate_error"),
        ),
    }
}
