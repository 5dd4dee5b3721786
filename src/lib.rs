//! # Checkchain
//!
//! Attach a chain of named checks to a single value, evaluate them in a fixed
//! order, and get back either the value or a configured fallback together
//! with every failure found.
//!
//! ## Overview
//!
//! A [`CheckedValue`] holds a subject, an optional fallback and an optional
//! display name. Chain methods attach rules (one per [`RuleKind`]; attaching
//! a kind again replaces it). [`CheckedValue::validate`] evaluates every
//! rule, never short-circuits, and never fails: problems are reported in the
//! returned [`Outcome`].
//!
//! [`validate_all`] runs many checked values and merges their results into
//! an [`AggregateReport`].
//!
//! ## Core Types
//!
//! - [`Check`]: Entry point for creating checked values
//! - [`CheckedValue`]: A subject with its rules, fallback and display name
//! - [`CheckError`]: A single failure (label, kind, message, expected/got)
//! - [`CheckErrors`]: A non-empty collection of failures
//! - [`KeySchema`]: Per-key predicates for structured subjects
//! - [`AggregateReport`]: Named results of a batch run
//!
//! ## Example
//!
//! ```rust
//! use checkchain::Check;
//! use serde_json::json;
//!
//! let mut level = Check::value(json!("verbose"))
//!     .with_fallback(json!("info"))
//!     .named("log_level")
//!     .type_(["string"])
//!     .enum_(["debug", "info", "warn", "error"]);
//!
//! let outcome = level.validate();
//! assert!(!outcome.is_valid);
//! assert_eq!(outcome.value, json!("info"));
//! assert_eq!(outcome.errors.len(), 1);
//! ```

pub mod aggregate;
pub mod checked;
pub mod error;
pub mod rule;
pub mod value;

pub use aggregate::{validate_all, validate_keyed, AggregateReport, ItemReport};
pub use checked::{CheckedValue, Outcome, DEFAULT_LABEL};
pub use error::{CheckError, CheckErrors, ConfigError};
pub use rule::{ClassRef, IntoVerdict, KeySchema, Prototype, RuleKind, Verdict};
pub use value::{Bound, Measure, TypeTag};

#[cfg(feature = "parallel")]
pub use aggregate::par_validate_all;

use serde_json::Value;

/// Type alias for validation results using CheckErrors
pub type ValidationResult<T> = stillwater::Validation<T, CheckErrors>;

/// Entry point for creating checked values.
///
/// # Example
///
/// ```rust
/// use checkchain::Check;
/// use serde_json::json;
///
/// let mut retries = Check::make(json!(3), Some(json!(1)), Some("retries".into()))
///     .range(0, 10);
///
/// let (value, is_valid, errors) = retries.validate().into_parts();
/// assert_eq!(value, json!(3));
/// assert!(is_valid);
/// assert!(errors.is_empty());
/// ```
pub struct Check;

impl Check {
    /// Creates a checked value with no rules, fallback or display name.
    pub fn value(subject: impl Into<Value>) -> CheckedValue {
        CheckedValue::new(subject)
    }

    /// Creates a checked value with an optional fallback and display name.
    pub fn make(
        subject: impl Into<Value>,
        fallback: Option<Value>,
        name: Option<String>,
    ) -> CheckedValue {
        CheckedValue::make(subject, fallback, name)
    }
}
