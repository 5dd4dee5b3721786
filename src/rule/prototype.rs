//! InstanceOf evaluation.
//!
//! Subjects are plain values, so class identity is structural: a
//! [`Prototype`] decides whether a value is one of its instances.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CheckError;
use crate::value::TypeTag;

use super::predicate::{caught, guarded, IntoVerdict, Verdict};
use super::RuleKind;

/// A class reference that values can be checked against.
///
/// Implement this for domain types whose instances cannot be described by
/// required members alone. [`ClassRef`] covers the common case.
pub trait Prototype: Send + Sync {
    /// The class name used in error messages.
    fn name(&self) -> &str;

    /// Returns true if `value` is an instance of this class.
    fn is_instance(&self, value: &Value) -> bool;
}

/// A structural class: an object is an instance if it carries every member
/// of this class and of each class it extends.
///
/// # Example
///
/// ```rust
/// use checkchain::{Check, ClassRef};
/// use serde_json::json;
///
/// let point = ClassRef::new("Point").member("x").member("y");
/// let point3 = ClassRef::new("Point3").member("z").extends(point.clone());
///
/// let mut p = Check::value(json!({"x": 1, "y": 2, "z": 3})).instance_of(point);
/// assert!(p.validate().is_valid);
///
/// let mut flat = Check::value(json!({"x": 1, "y": 2})).instance_of(point3);
/// assert!(!flat.validate().is_valid);
/// ```
#[derive(Clone)]
pub struct ClassRef {
    name: String,
    members: Vec<String>,
    parent: Option<Arc<ClassRef>>,
}

impl ClassRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            parent: None,
        }
    }

    /// Adds a required member key.
    pub fn member(mut self, key: impl Into<String>) -> Self {
        self.members.push(key.into());
        self
    }

    /// Sets the class this one extends.
    pub fn extends(mut self, parent: ClassRef) -> Self {
        self.parent = Some(Arc::new(parent));
        self
    }

    /// Class names from this class up to the root of its chain.
    pub fn chain(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        let mut current = self.parent.as_deref();
        while let Some(class) = current {
            names.push(class.name.as_str());
            current = class.parent.as_deref();
        }
        names
    }

    /// Every required member, own members first.
    pub fn members(&self) -> Vec<&str> {
        let mut all: Vec<&str> = self.members.iter().map(String::as_str).collect();
        let mut current = self.parent.as_deref();
        while let Some(class) = current {
            all.extend(class.members.iter().map(String::as_str));
            current = class.parent.as_deref();
        }
        all
    }
}

impl Prototype for ClassRef {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_instance(&self, value: &Value) -> bool {
        match value.as_object() {
            Some(obj) => self.members().iter().all(|m| obj.contains_key(*m)),
            None => false,
        }
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRef")
            .field("chain", &self.chain())
            .field("members", &self.members())
            .finish()
    }
}

/// Reads a prototype's name, or `<unknown>` if `name()` panics.
pub(crate) fn name_of(proto: &dyn Prototype) -> String {
    caught(|| proto.name().to_string()).unwrap_or_else(|_| UNKNOWN_NAME.to_string())
}

const UNKNOWN_NAME: &str = "<unknown>";

pub(super) fn check_instance_of(
    subject: &Value,
    label: &str,
    proto: &dyn Prototype,
) -> Option<CheckError> {
    match guarded(|| proto.is_instance(subject).into_verdict()) {
        Verdict::Pass => None,
        Verdict::Fail => {
            let name = name_of(proto);
            Some(
                CheckError::new(
                    label,
                    RuleKind::InstanceOf,
                    format!("expected an instance of {}", name),
                )
                .with_code("not_an_instance")
                .with_expected(name)
                .with_got(TypeTag::of(subject).name()),
            )
        }
        Verdict::Error(reason) => Some(
            CheckError::new(
                label,
                RuleKind::InstanceOf,
                format!("cannot compare with {}: {}", name_of(proto), reason),
            )
            .with_code("predicate_error"),
        ),
    }
}
