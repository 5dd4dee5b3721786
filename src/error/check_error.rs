//! Check failure types.
//!
//! This module provides [`CheckError`] for a single failed rule and
//! [`CheckErrors`] for accumulating the failures of one `validate` call.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::rule::RuleKind;

/// A single check failure with full context.
///
/// `CheckError` captures everything needed to explain a failure:
/// - **label**: Display name of the checked value (or the default label)
/// - **kind**: The rule kind that failed
/// - **key**: The key inside a structured subject, for key-level failures
/// - **message**: Human-readable reason derived from the rule's parameters
/// - **got** / **expected**: Optional actual and expected descriptions
/// - **code**: Machine-readable error code for programmatic handling
///
/// # Example
///
/// ```rust
/// use checkchain::{CheckError, RuleKind};
///
/// let error = CheckError::new("port", RuleKind::Max, "must be at most 65535")
///     .with_code("max_value")
///     .with_got("70000")
///     .with_expected("<= 65535");
///
/// assert_eq!(
///     error.to_string(),
///     "port: [max] must be at most 65535 (expected: <= 65535) (got: 70000)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CheckError {
    /// Display name of the checked value.
    pub label: String,
    /// The rule kind that failed.
    pub kind: RuleKind,
    /// Key within a structured subject, when the failure concerns one key.
    pub key: Option<String>,
    /// Human-readable error message.
    pub message: String,
    /// The actual value that was received (formatted as string).
    pub got: Option<String>,
    /// Description of what was expected.
    pub expected: Option<String>,
    /// Machine-readable error code (e.g., `min_value`).
    pub code: String,
}

impl CheckError {
    /// Creates a new check error for the given label, kind and message.
    ///
    /// The error code defaults to the kind's name. Use `with_code` to set
    /// a more specific code.
    pub fn new(label: impl Into<String>, kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind,
            key: None,
            message: message.into(),
            got: None,
            expected: None,
            code: kind.name().to_string(),
        }
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the key the failure refers to and returns self for chaining.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the "got" (actual value) field and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Sets the "expected" field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

impl Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if let Some(ref key) = self.key {
            write!(f, ".{}", key)?;
        }
        write!(f, ": [{}] {}", self.kind, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for CheckError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<CheckError>();
    assert_sync::<CheckError>();
};

/// A non-empty collection of check failures.
///
/// `CheckErrors` wraps a `NonEmptyVec<CheckError>` so that a failed
/// `Validation<T, CheckErrors>` always carries at least one reason.
///
/// # Combining Errors
///
/// ```rust
/// use checkchain::{CheckError, CheckErrors, RuleKind};
/// use stillwater::prelude::*;
///
/// let a = CheckErrors::single(CheckError::new("a", RuleKind::Min, "too small"));
/// let b = CheckErrors::single(CheckError::new("b", RuleKind::Pattern, "no match"));
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CheckErrors(NonEmptyVec<CheckError>);

impl CheckErrors {
    /// Creates a `CheckErrors` containing a single error.
    pub fn single(error: CheckError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `CheckErrors` from a `Vec`, or `None` when it is empty.
    pub fn from_vec(errors: Vec<CheckError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = NonEmptyVec::singleton(errors.next()?);
        Some(Self(errors.fold(head, |acc, e| {
            acc.combine(NonEmptyVec::singleton(e))
        })))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &CheckError> {
        self.0.iter()
    }

    /// Returns all errors raised by the given rule kind.
    pub fn of_kind(&self, kind: RuleKind) -> Vec<&CheckError> {
        self.0.iter().filter(|e| e.kind == kind).collect()
    }

    /// Returns all errors with the specified error code.
    pub fn with_code(&self, code: &str) -> Vec<&CheckError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &CheckError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<CheckError>`.
    pub fn into_vec(self) -> Vec<CheckError> {
        self.0.into_vec()
    }
}

impl Semigroup for CheckErrors {
    fn combine(self, other: Self) -> Self {
        CheckErrors(self.0.combine(other.0))
    }
}

impl Display for CheckErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} check(s) failed:", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for CheckErrors {}

impl IntoIterator for CheckErrors {
    type Item = CheckError;
    type IntoIter = std::vec::IntoIter<CheckError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}
