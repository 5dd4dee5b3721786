//! Integration tests for rules over structured (object) subjects.

use checkchain::{Check, ClassRef, KeySchema, Prototype, RuleKind};
use serde_json::{json, Value};

fn is_non_empty_string(v: Option<&Value>) -> bool {
    v.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}

fn is_positive_number(v: Option<&Value>) -> bool {
    v.and_then(Value::as_f64).is_some_and(|n| n > 0.0)
}

fn player_schema() -> KeySchema {
    KeySchema::new()
        .key("id", is_non_empty_string)
        .key("level", is_positive_number)
}

#[test]
fn test_schema_valid_subject() {
    let mut checked = Check::value(json!({"id": "abc", "level": 5})).schema(player_schema());
    assert!(checked.validate().is_valid);
}

#[test]
fn test_schema_single_failing_key() {
    let mut checked = Check::value(json!({"id": "", "level": 5}))
        .named("player")
        .schema(player_schema());
    let outcome = checked.validate();

    assert!(!outcome.is_valid);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].key.as_deref(), Some("id"));
    assert!(outcome.messages()[0].starts_with("player.id: [schema]"));
}

#[test]
fn test_schema_missing_key_passes_none_to_predicate() {
    let schema = KeySchema::new()
        .key("id", is_non_empty_string)
        .key("nickname", |v: Option<&Value>| {
            v.map_or(true, |v| v.is_string())
        });

    let mut checked = Check::value(json!({"id": "abc"})).schema(schema.clone());
    assert!(checked.validate().is_valid);

    let mut checked = Check::value(json!({"nickname": "x"})).schema(schema);
    let outcome = checked.validate();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].got.as_deref(), Some("absent"));
}

#[test]
fn test_schema_extra_subject_keys_ignored() {
    let mut checked =
        Check::value(json!({"id": "abc", "level": 1, "extra": null})).schema(player_schema());
    assert!(checked.validate().is_valid);
}

#[test]
fn test_schema_non_object_subject() {
    let mut checked = Check::value(json!("abc")).schema(player_schema());
    let outcome = checked.validate();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].code, "invalid_type");
    assert!(outcome.errors[0].key.is_none());
}

#[test]
fn test_schema_fallible_predicate() {
    let schema = KeySchema::new().key("port", |v: Option<&Value>| {
        let raw = v.and_then(Value::as_str).ok_or("port must be a string")?;
        raw.parse::<u16>().map(|p| p > 0).map_err(|e| e.to_string())
    });

    let mut checked = Check::value(json!({"port": "http"})).schema(schema);
    let outcome = checked.validate();
    assert_eq!(outcome.errors[0].code, "predicate_error");
    assert!(outcome.errors[0].message.contains("invalid digit"));
}

#[test]
fn test_has_key_and_has_keys() {
    let mut checked = Check::value(json!({"a": 1, "b": null}))
        .has_key("a")
        .has_keys(["a", "b"]);
    let outcome = checked.validate();

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].kind, RuleKind::HasKeys);
    assert_eq!(outcome.errors[0].key.as_deref(), Some("b"));
}

#[test]
fn test_has_key_replaced() {
    let mut checked = Check::value(json!({"b": 1})).has_key("a").has_key("b");
    assert!(checked.validate().is_valid);
}

#[test]
fn test_instance_of_class_chain() {
    let entity = ClassRef::new("Entity").member("id");
    let user = ClassRef::new("User").member("email").extends(entity.clone());

    let mut full = Check::value(json!({"id": 1, "email": "a@b.c"})).instance_of(user.clone());
    assert!(full.validate().is_valid);

    let mut as_entity = Check::value(json!({"id": 1, "email": "a@b.c"})).instance_of(entity);
    assert!(as_entity.validate().is_valid);

    let mut partial = Check::value(json!({"email": "a@b.c"})).instance_of(user);
    let outcome = partial.validate();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].message, "expected an instance of User");
}

struct Uuid;

impl Prototype for Uuid {
    fn name(&self) -> &str {
        "Uuid"
    }

    fn is_instance(&self, value: &Value) -> bool {
        value
            .as_str()
            .is_some_and(|s| s.len() == 36 && s.chars().filter(|c| *c == '-').count() == 4)
    }
}

#[test]
fn test_instance_of_custom_prototype() {
    let mut id = Check::value(json!("123e4567-e89b-12d3-a456-426614174000")).instance_of(Uuid);
    assert!(id.validate().is_valid);

    let mut bad = Check::value(json!("nope")).instance_of(Uuid);
    assert!(!bad.validate().is_valid);
}

#[test]
fn test_structured_rules_evaluated_in_fixed_order() {
    let mut checked = Check::value(json!({}))
        .schema(player_schema())
        .has_keys(["id"])
        .has_key("id")
        .instance_of(ClassRef::new("Player").member("id"));

    let kinds: Vec<RuleKind> = checked.validate().errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RuleKind::InstanceOf,
            RuleKind::HasKey,
            RuleKind::HasKeys,
            RuleKind::Schema,
            RuleKind::Schema,
        ]
    );
}

struct Anonymous;

impl Prototype for Anonymous {
    fn name(&self) -> &str {
        panic!("anonymous prototypes have no name")
    }

    fn is_instance(&self, value: &Value) -> bool {
        value.is_object()
    }
}

#[test]
fn test_panicking_prototype_name_stays_inside_validate() {
    let mut checked = Check::value(json!([1, 2])).named("row").instance_of(Anonymous);

    let outcome = checked.validate();
    assert!(!outcome.is_valid);
    assert_eq!(outcome.errors[0].code, "not_an_instance");
    assert_eq!(
        outcome.messages()[0],
        "row: [instance_of] expected an instance of <unknown> (expected: <unknown>) (got: array)"
    );
    assert!(format!("{:?}", checked).contains("InstanceOf(\"<unknown>\")"));

    let mut object = Check::value(json!({})).instance_of(Anonymous);
    assert!(object.validate().is_valid);
}
