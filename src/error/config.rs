//! Malformed rule configuration.

/// A rule whose parameters cannot be evaluated.
///
/// Attaching a rule never fails; these are detected when the rule is
/// evaluated and reported as that rule failing with code `invalid_config`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A Type rule was given no type tags.
    #[error("no type tags configured")]
    EmptyTypeSet,

    /// A Type rule named a tag that does not exist.
    #[error("unknown type tag '{0}'")]
    UnknownTypeTag(String),

    /// A Min, Max or Range bound is NaN or infinite.
    #[error("bound {0} is not a finite number")]
    NonFiniteBound(f64),

    /// A Range rule whose minimum exceeds its maximum.
    #[error("range minimum {min} is greater than maximum {max}")]
    InvertedRange { min: f64, max: f64 },

    /// A Pattern rule whose regex failed to compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// An Enum rule was given no allowed values.
    #[error("no allowed values configured")]
    EmptyEnum,

    /// A HasKeys rule was given no key names.
    #[error("no keys configured")]
    EmptyKeySet,
}
