//! Tests for size, key and single-entry assertions.

use anyhow::Result;
use mapfacts::*;
use std::collections::HashMap;

fn message_of(expect: &ExpectFailure) -> String {
    expect.failure().map(|f| f.message()).unwrap_or_default()
}

#[test]
fn test_is_empty() {
    assert_that(&mapping! {}).is_empty();
    assert_that(&mapping! { 1 => 5 }).is_not_empty();

    let expect = ExpectFailure::new();
    expect.that(&mapping! { 1 => 5 }).is_empty();
    let failure = expect.failure().expect("should fail");
    assert_eq!(failure.fact_keys(), vec!["expected to be empty", "but was"]);

    expect.that(&mapping! {}).is_not_empty();
    let failure = expect.failure().expect("should fail");
    assert_eq!(failure.fact_keys(), vec!["expected not to be empty"]);
}

#[test]
fn test_has_size() -> Result<()> {
    assert_that(&mapping! { 1 => 2, 3 => 4 }).has_size(2)?;
    assert_that(&mapping! {}).has_size(0)?;

    let expect = ExpectFailure::new();
    expect.that(&mapping! { 1 => 2 }).has_size(3)?;
    let failure = expect.failure().expect("should fail");
    assert_eq!(
        failure.fact_keys(),
        vec!["value of", "expected", "but was", "map was"]
    );
    assert_eq!(failure.fact_value("value of", 0), Some("map.size()"));
    assert_eq!(failure.fact_value("expected", 0), Some("3"));
    assert_eq!(failure.fact_value("but was", 0), Some("1"));
    Ok(())
}

#[test]
fn test_has_size_negative_is_a_usage_error() {
    let expect = ExpectFailure::new();
    let err = expect.that(&mapping! { 1 => 2 }).has_size(-1).unwrap_err();
    assert_eq!(err, UsageError::NegativeSize(-1));
    assert_eq!(expect.failure_count(), 0);
}

#[test]
fn test_has_size_beyond_the_actual_length_is_a_mismatch() -> Result<()> {
    let expect = ExpectFailure::new();
    expect.that(&mapping! { 1 => 2 }).has_size(5_000_000_000)?;
    let failure = expect.failure().expect("should fail");
    assert_eq!(failure.fact_value("expected", 0), Some("5000000000"));
    assert_eq!(failure.fact_value("but was", 0), Some("1"));
    Ok(())
}

#[test]
fn test_index_keyed_map() {
    let actual = HashMap::from([(0_usize, "zero"), (1_usize, "one")]);
    assert_that(&actual).contains_key(1_usize);
    assert_that(&actual).contains_entry(0_usize, "zero");

    let expect = ExpectFailure::new();
    expect.that(&actual).contains_key(1);
    let failure = expect.failure().expect("i32 key must not match a usize key");
    assert_eq!(failure.fact_value("an instance of", 0), Some("i32"));
    assert_eq!(
        failure.fact_value("though it did contain", 0),
        Some("[1] (u64)")
    );
}

#[test]
fn test_contains_key() {
    let actual = mapping! { "kurt" => "kluever" };
    assert_that(&actual).contains_key("kurt");
    assert_that(&actual).does_not_contain_key("greg");
    assert_that(&actual).does_not_contain_key(Value::Null);

    let expect = ExpectFailure::new();
    expect.that(&actual).contains_key("greg");
    let failure = expect.failure().expect("should fail");
    assert_eq!(
        failure.fact_keys(),
        vec!["value of", "expected to contain", "but was", "map was"]
    );
    assert_eq!(failure.fact_value("value of", 0), Some("map.keys()"));
    assert_eq!(failure.fact_value("expected to contain", 0), Some("greg"));
    assert_eq!(failure.fact_value("but was", 0), Some("[kurt]"));

    expect.that(&actual).contains_key(Value::Null);
    let failure = expect.failure().expect("should fail");
    assert_eq!(failure.fact_value("expected to contain", 0), Some("null"));
}

#[test]
fn test_contains_null_key() {
    let actual = HashMap::from([(Value::Null, Value::from("null"))]);
    assert_that(&actual).contains_key(Value::Null);

    let expect = ExpectFailure::new();
    expect.that(&actual).does_not_contain_key(Value::Null);
    let failure = expect.failure().expect("should fail");
    assert_eq!(
        failure.fact_keys(),
        vec!["value of", "expected not to contain", "but was", "map was"]
    );
    assert_eq!(failure.fact_value("but was", 0), Some("[null]"));
}

#[test]
fn test_contains_key_with_same_display() {
    let expect = ExpectFailure::new();
    expect
        .that(&mapping! { 1_i64 => "value1", 2_i64 => "value2", "1" => "value3" })
        .contains_key(1);
    let failure = expect.failure().expect("should fail");
    assert_eq!(
        failure.fact_keys(),
        vec![
            "value of",
            "expected to contain",
            "an instance of",
            "but did not",
            "though it did contain",
            "full contents",
            "map was",
        ]
    );
    assert_eq!(failure.fact_value("expected to contain", 0), Some("1"));
    assert_eq!(failure.fact_value("an instance of", 0), Some("i32"));
    assert_eq!(
        failure.fact_value("though it did contain", 0),
        Some("[1 (i64), 1 (String)]")
    );
    assert_eq!(failure.fact_value("full contents", 0), Some("[1, 2, 1]"));
}

#[test]
fn test_contains_key_null_against_null_string() {
    let expect = ExpectFailure::new();
    expect
        .that(&mapping! { "null" => "value1" })
        .contains_key(Value::Null);
    let failure = expect.failure().expect("should fail");
    assert_eq!(failure.fact_value("an instance of", 0), Some("null type"));
    assert_eq!(
        failure.fact_value("though it did contain", 0),
        Some("[null] (String)")
    );
}

#[test]
fn test_contains_entry() {
    let actual = mapping! { "kurt" => "kluever" };
    assert_that(&actual).contains_entry("kurt", "kluever");
    assert_that(&mapping! { Value::Null => Value::Null }).contains_entry(Value::Null, Value::Null);
    assert_that(&mapping! { "a" => Value::Null }).contains_entry("a", Value::Null);

    let expect = ExpectFailure::new();
    expect.that(&actual).contains_entry("greg", "kick");
    assert_eq!(
        message_of(&expect),
        "Not true that <{kurt=kluever}> contains entry <greg=kick>"
    );

    expect.that(&actual).contains_entry(Value::Null, Value::Null);
    assert_eq!(
        message_of(&expect),
        "Not true that <{kurt=kluever}> contains entry <null=null>"
    );
}

#[test]
fn test_contains_entry_key_with_same_display() {
    let expect = ExpectFailure::new();
    expect
        .that(&mapping! { 1_i64 => "value1", 2_i64 => "value2" })
        .contains_entry(1, "value1");
    assert_eq!(
        message_of(&expect),
        "Not true that <{1=value1, 2=value2}> contains entry \
         <1=value1 (entry<i32, String>)>. However, it does contain keys <[1] (i64)>."
    );
}

#[test]
fn test_contains_entry_value_with_same_display() {
    let expect = ExpectFailure::new();
    expect
        .that(&mapping! { 1 => "null" })
        .contains_entry(2, Value::Null);
    assert_eq!(
        message_of(&expect),
        "Not true that <{1=null}> contains entry <2=null (entry<i32, null type>)>. \
         However, it does contain values <[null] (String)>."
    );
}

#[test]
fn test_contains_entry_value_under_other_keys() {
    let expect = ExpectFailure::new();
    expect
        .that(&mapping! { Value::Null => Value::Null })
        .contains_entry("kurt", Value::Null);
    assert_eq!(
        message_of(&expect),
        "Not true that <{null=null}> contains entry <kurt=null>. \
         However, the following keys are mapped to <null>: [null]"
    );
}

#[test]
fn test_contains_entry_key_present_with_different_value() {
    let expect = ExpectFailure::new();

    for (actual, value, expected, but_was) in [
        (mapping! { "a" => "A" }, Value::from("a"), "a", "A"),
        (mapping! { "a" => Value::Null }, Value::from("A"), "A", "null"),
        (mapping! { "a" => "A" }, Value::Null, "null", "A"),
    ] {
        expect.that(&actual).contains_entry("a", value);
        let failure = expect.failure().expect("should fail");
        assert_eq!(
            failure.fact_keys(),
            vec![
                "key is present but with a different value",
                "value of",
                "expected",
                "but was",
                "map was",
            ]
        );
        assert_eq!(failure.fact_value("value of", 0), Some("map.get(a)"));
        assert_eq!(failure.fact_value("expected", 0), Some(expected));
        assert_eq!(failure.fact_value("but was", 0), Some(but_was));
        assert_eq!(failure.fact_value("map was", 0), Some(actual.to_string().as_str()));
    }
}

#[test]
fn test_contains_entry_present_key_with_look_alike_value() {
    let expect = ExpectFailure::new();
    expect.that(&mapping! { 1 => "null" }).contains_entry(1, Value::Null);
    let failure = expect.failure().expect("should fail");
    assert_eq!(failure.fact_value("expected", 0), Some("null (null type)"));
    assert_eq!(failure.fact_value("but was", 0), Some("null (String)"));
}

#[test]
fn test_does_not_contain_entry() {
    let actual = mapping! { "kurt" => "kluever" };
    assert_that(&actual).does_not_contain_entry("greg", "kick");
    assert_that(&actual).does_not_contain_entry(Value::Null, Value::Null);
    assert_that(&actual).does_not_contain_entry("kurt", Value::Null);
    assert_that(&actual).does_not_contain_entry(Value::Null, "kluever");

    let expect = ExpectFailure::new();
    expect.that(&actual).does_not_contain_entry("kurt", "kluever");
    let failure = expect.failure().expect("should fail");
    assert_eq!(
        failure.fact_keys(),
        vec!["value of", "expected not to contain", "but was"]
    );
    assert_eq!(failure.fact_value("value of", 0), Some("map.entries()"));
    assert_eq!(
        failure.fact_value("expected not to contain", 0),
        Some("kurt=kluever")
    );
    assert_eq!(failure.fact_value("but was", 0), Some("[kurt=kluever]"));

    expect
        .that(&mapping! { Value::Null => Value::Null })
        .does_not_contain_entry(Value::Null, Value::Null);
    let failure = expect.failure().expect("should fail");
    assert_eq!(failure.fact_value("but was", 0), Some("[null=null]"));
}

#[test]
fn test_custom_message_leads_the_report() {
    let expect = ExpectFailure::new();
    expect
        .builder()
        .with_message("month lookup")
        .that(&mapping! { "jan" => 1 })
        .contains_key("feb");
    let failure = expect.failure().expect("should fail");
    assert_eq!(failure.custom_message(), Some("month lookup"));
    assert!(failure.message().starts_with("month lookup\nvalue of: map.keys()"));
}

#[test]
#[should_panic(expected = "expected to contain: feb")]
fn test_assert_with_message_panics() {
    assert_with_message("months")
        .that(&mapping! { "jan" => 1 })
        .contains_key("feb");
}
