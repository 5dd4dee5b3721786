//! Batch validation of many checked values.
//!
//! This module provides [`validate_all`] and [`validate_keyed`], which run
//! `validate` on every item and merge the results into one
//! [`AggregateReport`] keyed by display name.
//!
//! # Naming
//!
//! Items with a display name are recorded under it. Items without one are
//! recorded under their positional key (the index, or the caller's key for
//! [`validate_keyed`]). A positional key or repeated display name that is
//! already taken is prefixed with `#` until it is unique.
//!
//! # Example
//!
//! ```rust
//! use checkchain::{validate_all, Check};
//! use serde_json::json;
//!
//! let mut items = vec![
//!     Check::value(json!("db.internal")).named("host").type_(["string"]),
//!     Check::value(json!(5432)).named("port").range(1, 65535),
//!     Check::value(json!(-1)).min(0),
//! ];
//!
//! let report = validate_all(&mut items);
//! assert!(!report.all_valid());
//! assert!(report.get("host").unwrap().is_valid);
//! assert!(!report.get("2").unwrap().is_valid);
//! ```

use std::collections::HashSet;
use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::checked::{CheckedValue, Outcome};
use crate::error::CheckError;

/// The recorded result of one item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    pub value: Value,
    pub is_valid: bool,
    pub errors: Vec<CheckError>,
}

impl From<Outcome> for ItemReport {
    fn from(outcome: Outcome) -> Self {
        Self {
            value: outcome.value,
            is_valid: outcome.is_valid,
            errors: outcome.errors,
        }
    }
}

impl ItemReport {
    /// The errors formatted as strings.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Results of a batch run, keyed by item name in input order.
///
/// `all_valid` is true iff every item is valid (vacuously true when empty).
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    results: IndexMap<String, ItemReport>,
    all_valid: bool,
}

impl AggregateReport {
    fn new(results: IndexMap<String, ItemReport>) -> Self {
        let all_valid = results.values().all(|r| r.is_valid);
        Self { results, all_valid }
    }

    pub fn all_valid(&self) -> bool {
        self.all_valid
    }

    pub fn get(&self, name: &str) -> Option<&ItemReport> {
        self.results.get(name)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterates `(name, report)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemReport)> {
        self.results.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates only the items that failed.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ItemReport)> {
        self.iter().filter(|(_, r)| !r.is_valid)
    }

    /// Renders the report as `{ "allValid", "results": { name: { value, isValid, errors } } }`.
    pub fn to_json(&self) -> Value {
        let results: serde_json::Map<String, Value> = self
            .results
            .iter()
            .map(|(name, r)| {
                (
                    name.clone(),
                    json!({
                        "value": r.value,
                        "isValid": r.is_valid,
                        "errors": r.messages(),
                    }),
                )
            })
            .collect();

        json!({
            "allValid": self.all_valid,
            "results": results,
        })
    }
}

impl Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failures().count();
        writeln!(
            f,
            "{} of {} item(s) valid",
            self.results.len() - failed,
            self.results.len()
        )?;
        for (name, report) in self.failures() {
            writeln!(f, "  {}:", name)?;
            for error in &report.errors {
                writeln!(f, "    - {}", error)?;
            }
        }
        Ok(())
    }
}

/// Validates every item, naming unnamed items by their index.
pub fn validate_all<'a, I>(items: I) -> AggregateReport
where
    I: IntoIterator<Item = &'a mut CheckedValue>,
{
    validate_keyed(items.into_iter().enumerate())
}

/// Validates every item, naming unnamed items by the caller's key.
pub fn validate_keyed<'a, K, I>(items: I) -> AggregateReport
where
    K: Display,
    I: IntoIterator<Item = (K, &'a mut CheckedValue)>,
{
    let runs: Vec<(String, Option<String>, Outcome)> = items
        .into_iter()
        .map(|(key, item)| {
            let outcome = item.validate();
            (key.to_string(), item.name().map(str::to_string), outcome)
        })
        .collect();
    collect_report(runs)
}

/// Validates items concurrently; naming and ordering match [`validate_all`].
#[cfg(feature = "parallel")]
pub fn par_validate_all(items: &mut [CheckedValue]) -> AggregateReport {
    use rayon::prelude::*;

    let runs: Vec<(String, Option<String>, Outcome)> = items
        .par_iter_mut()
        .enumerate()
        .map(|(index, item)| {
            let outcome = item.validate();
            (index.to_string(), item.name().map(str::to_string), outcome)
        })
        .collect();
    collect_report(runs)
}

fn collect_report(runs: Vec<(String, Option<String>, Outcome)>) -> AggregateReport {
    let entries: Vec<(String, Option<String>)> = runs
        .iter()
        .map(|(key, name, _)| (key.clone(), name.clone()))
        .collect();
    let names = assign_names(&entries);

    let results: IndexMap<String, ItemReport> = names
        .into_iter()
        .zip(runs)
        .map(|(name, (_, _, outcome))| (name, ItemReport::from(outcome)))
        .collect();

    let report = AggregateReport::new(results);
    log::debug!(
        "validated {} item(s), {} failed",
        report.len(),
        report.failures().count()
    );
    report
}

/// Picks a unique result name for each `(positional key, display name)` entry.
///
/// Display names are reserved before positional keys are assigned, so a
/// positional key never takes a name an item explicitly asked for.
fn assign_names(entries: &[(String, Option<String>)]) -> Vec<String> {
    let reserved: HashSet<&str> = entries
        .iter()
        .filter_map(|(_, name)| name.as_deref())
        .collect();
    let mut used: HashSet<String> = HashSet::new();

    entries
        .iter()
        .map(|(key, name)| {
            let mut candidate = match name {
                Some(name) if !used.contains(name) => name.clone(),
                Some(name) => format!("{}#{}", name, key),
                None => key.clone(),
            };
            let explicit = name.as_deref() == Some(candidate.as_str());
            while used.contains(&candidate) || (!explicit && reserved.contains(candidate.as_str()))
            {
                candidate.insert(0, '#');
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}
