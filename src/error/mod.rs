//! Error types for check failures.
//!
//! This module provides types for representing check failures with the
//! label of the checked value, the failing rule kind, and expected/actual context.

mod check_error;
mod config;

pub use check_error::{CheckError, CheckErrors};
pub use config::ConfigError;
