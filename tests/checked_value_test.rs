//! Integration tests for the checked value chain and `validate`.

use checkchain::{Check, CheckedValue, RuleKind};
use serde_json::{json, Value};

#[test]
fn test_no_rules_returns_subject() {
    for subject in [json!(null), json!(1.5), json!("x"), json!([1]), json!({"a": 1})] {
        let mut checked = Check::value(subject.clone());
        let (value, is_valid, errors) = checked.validate().into_parts();
        assert_eq!(value, subject);
        assert!(is_valid);
        assert!(errors.is_empty());
    }
}

#[test]
fn test_reattached_kind_uses_latest_configuration() {
    let mut checked = Check::value(json!(3)).min(0).min(5);
    let outcome = checked.validate();

    assert!(!outcome.is_valid);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].message.contains('5'));
    assert!(!outcome.errors[0].message.contains('0'));
}

#[test]
fn test_evaluation_order_ignores_attachment_order() {
    // Max attached before Min; Type attached last.
    let mut checked = Check::value(json!("abcdef"))
        .max(3)
        .min(10)
        .pattern("^z")
        .type_(["number"]);

    let kinds: Vec<RuleKind> = checked.validate().errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![RuleKind::Type, RuleKind::Min, RuleKind::Max, RuleKind::Pattern]
    );
}

#[test]
fn test_no_short_circuit_reports_every_failure() {
    let mut checked = Check::value(json!(42))
        .type_(["string"])
        .pattern("x")
        .enum_([1, 2])
        .has_key("a");

    let outcome = checked.validate();
    assert_eq!(outcome.errors.len(), 4);
}

#[test]
fn test_fallback_on_failure() {
    let mut checked = Check::value(json!(-1)).with_fallback(json!(10)).min(0);
    let (value, is_valid, errors) = checked.validate().into_parts();

    assert_eq!(value, json!(10));
    assert!(!is_valid);
    assert!(!errors.is_empty());
}

#[test]
fn test_no_fallback_returns_subject_on_failure() {
    let mut checked = Check::value(json!(-1)).min(0);
    let (value, is_valid, errors) = checked.validate().into_parts();

    assert_eq!(value, json!(-1));
    assert!(!is_valid);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_fallback_unused_when_valid() {
    let mut checked = Check::value(json!(5)).with_fallback(json!(10)).min(0);
    assert_eq!(checked.validate().value, json!(5));
}

#[test]
fn test_validate_is_idempotent() {
    let mut checked = Check::value(json!("ab"))
        .named("code")
        .min(3)
        .pattern(r"^\d+$");

    let first = checked.validate();
    let second = checked.validate();
    assert_eq!(first, second);
    assert_eq!(checked.get_errors(), second.errors.as_slice());
}

#[test]
fn test_get_errors_tracks_latest_validate() {
    let mut checked = Check::value(json!(1)).min(5);
    assert!(checked.get_errors().is_empty());

    checked.validate();
    assert_eq!(checked.get_errors().len(), 1);

    let mut checked = checked.min(0);
    assert_eq!(checked.get_errors().len(), 1);
    checked.validate();
    assert!(checked.get_errors().is_empty());
}

#[test]
fn test_messages_carry_label_kind_and_reason() {
    let mut named = Check::value(json!(3)).named("retries").min(5);
    assert_eq!(
        named.validate().messages(),
        vec!["retries: [min] must be at least 5 (expected: >= 5) (got: 3)"]
    );

    let mut unnamed = Check::value(json!("x")).pattern("^[0-9]+$");
    assert_eq!(
        unnamed.validate().messages(),
        vec!["value: [pattern] must match pattern '^[0-9]+$' (got: x)"]
    );
}

#[test]
fn test_range_cases() {
    let outcome = |subject: Value| Check::value(subject).range(0, 200).validate();

    assert!(outcome(json!(100)).is_valid);

    let low = outcome(json!(-5));
    assert!(!low.is_valid);
    assert_eq!(low.errors.len(), 1);

    let high = outcome(json!(250));
    assert!(!high.is_valid);
    assert_eq!(high.errors.len(), 1);

    assert!(!outcome(json!(true)).is_valid);
    assert!(!outcome(json!({"n": 100})).is_valid);
    assert!(!outcome(json!(null)).is_valid);
}

#[test]
fn test_range_on_sized_subjects() {
    let mut name = Check::value(json!("alice")).range(3, 16);
    assert!(name.validate().is_valid);

    let mut tags = Check::value(json!(["a"])).range(2, 4);
    let outcome = tags.validate();
    assert_eq!(outcome.errors[0].code, "length_out_of_range");
}

#[test]
fn test_inverted_range_fails_at_validate() {
    let mut checked = Check::value(json!(5)).range(10, 1);
    let outcome = checked.validate();
    assert!(!outcome.is_valid);
    assert_eq!(outcome.errors[0].code, "invalid_config");
}

#[test]
fn test_pattern_non_string_always_fails() {
    for subject in [json!(123), json!(null), json!([]), json!({})] {
        let mut checked = Check::value(subject).pattern("");
        let outcome = checked.validate();
        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors[0].kind, RuleKind::Pattern);
    }
}

#[test]
fn test_invalid_pattern_attaches_then_fails() {
    let mut checked = Check::value(json!("a")).pattern("[");
    let outcome = checked.validate();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].code, "invalid_config");
}

#[test]
fn test_has_keys_names_missing_key() {
    let mut checked = Check::value(json!({"a": 1})).has_keys(["a", "b"]);
    let outcome = checked.validate();

    assert!(!outcome.is_valid);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].message.contains("'b'"));
}

#[test]
fn test_custom_panic_becomes_failure() {
    let mut checked = Check::value(json!([])).custom(|v: &Value| {
        let items = v.as_array().unwrap();
        items[0].is_string()
    });

    let outcome = checked.validate();
    assert!(!outcome.is_valid);
    assert_eq!(outcome.errors[0].code, "predicate_error");
}

#[test]
fn test_custom_described() {
    let mut checked = Check::value(json!(7))
        .named("workers")
        .custom_described("a power of two", |v: &Value| {
            v.as_u64().is_some_and(u64::is_power_of_two)
        });

    let outcome = checked.validate();
    assert_eq!(
        outcome.messages(),
        vec!["workers: [custom] must satisfy a power of two (got: 7)"]
    );
}

#[test]
fn test_type_tags() {
    let mut int = Check::value(json!(3)).type_(["number"]);
    assert!(int.validate().is_valid);

    let mut float = Check::value(json!(3.5)).type_(["integer"]);
    assert!(!float.validate().is_valid);

    let mut nullable = Check::value(json!(null)).type_(["string", "null"]);
    assert!(nullable.validate().is_valid);
}

#[test]
fn test_checked_values_are_independent() {
    let base = Check::value(json!(1)).min(5);
    let mut a = base.clone();
    let mut b = base.min(0);

    assert!(!a.validate().is_valid);
    assert!(b.validate().is_valid);
    assert!(!a.get_errors().is_empty());
    assert!(b.get_errors().is_empty());
}

#[test]
fn test_debug_lists_rules() {
    let checked: CheckedValue = Check::value(json!(1)).named("n").min(0).has_key("k");
    let debug = format!("{:?}", checked);
    assert!(debug.contains("Min(0.0)"));
    assert!(debug.contains("HasKey(\"k\")"));
}

#[test]
fn test_enum_distinguishes_large_integer_ids() {
    let mut checked = Check::value(json!(9_007_199_254_740_993u64))
        .enum_([json!(9_007_199_254_740_992u64)]);
    assert!(!checked.validate().is_valid);

    let mut checked = Check::value(json!(-9_007_199_254_740_993i64))
        .enum_([json!(-9_007_199_254_740_992i64)]);
    assert!(!checked.validate().is_valid);

    let mut checked = Check::value(json!(2.0)).enum_([1, 2, 3]);
    assert!(checked.validate().is_valid);
}

#[test]
fn test_unmeasurable_subject_names_bound() {
    let mut checked = Check::value(json!({"n": 1})).named("limit").min(5);
    assert_eq!(
        checked.validate().messages(),
        vec!["limit: [min] value has no numeric value or size (number, string or array required) (expected: >= 5) (got: object)"]
    );
}

#[test]
fn test_bounds_accept_sizes_and_wide_integers() {
    let buf = [0u8; 3];
    let mut name = Check::value(json!("ab")).min(buf.len());
    let outcome = name.validate();
    assert!(!outcome.is_valid);
    assert_eq!(outcome.errors[0].expected.as_deref(), Some(">= 3"));

    let mut size = Check::value(json!(4096)).range(0u64, 1u64 << 20).max(i64::MAX);
    assert!(size.validate().is_valid);
}
