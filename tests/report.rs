//! Tests for failure reports, recording strategies and serialization.

mod common;

use anyhow::Result;
use common::{case_insensitive, init_logging};
use mapfacts::*;

#[test]
fn test_fact_display() {
    assert_eq!(Fact::new("expected", 3).to_string(), "expected: 3");
    assert_eq!(Fact::simple("but did not").to_string(), "but did not");
}

#[test]
fn test_report_renders_one_line_per_fact() {
    let report = FailureReport::new()
        .with(Fact::new("value of", "map.size()"))
        .with(Fact::new("expected", 2))
        .with(Fact::new("but was", 1));
    assert_eq!(report.len(), 3);
    assert_eq!(
        report.to_string(),
        "value of: map.size()\nexpected: 2\nbut was: 1"
    );
    assert_eq!(report.value("expected"), Some("2"));
    assert_eq!(report.value("missing"), None);
}

#[test]
fn test_exception_facts_count_repeated_failures() {
    let mut trace = ExceptionTrace::new();
    trace.record(
        Phase::Compare,
        &Value::Null,
        &Value::from("a"),
        CompareError::null_value(),
    );
    trace.record(
        Phase::Compare,
        &Value::Null,
        &Value::from("b"),
        CompareError::null_value(),
    );
    trace.record(
        Phase::FormatDiff,
        &Value::from(1),
        &Value::from("b"),
        CompareError::failed("no diff"),
    );

    let report = FailureReport::new()
        .with(Fact::simple("headline"))
        .with_exceptions(trace);
    assert_eq!(
        report.keys().collect::<Vec<_>>(),
        vec![
            "headline",
            "additionally, one or more exceptions were thrown while comparing values",
            "first exception",
            "total exceptions",
            "additionally, one or more exceptions were thrown while formatting diffs",
            "first exception",
        ]
    );
    assert_eq!(
        report.values("first exception").collect::<Vec<_>>(),
        vec![
            "compare(null, a) threw NullValue: null values are not supported",
            "formatDiff(1, b) threw Failed: no diff",
        ]
    );
    assert_eq!(report.value("total exceptions"), Some("2"));
    assert_eq!(report.exceptions().len(), 3);
}

#[test]
fn test_failure_serializes_to_json() -> Result<()> {
    let expect = ExpectFailure::new();
    expect
        .builder()
        .with_message("lookup table")
        .that(&mapping! { "jan" => 1 })
        .named("months")
        .contains_key("feb");
    let failure = expect.failure().expect("should fail");

    let json: serde_json::Value = serde_json::from_str(&failure.to_json()?)?;
    assert_eq!(json["message"], "lookup table");
    assert_eq!(json["name"], "months");
    assert_eq!(json["report"]["facts"][0]["key"], "value of");
    assert_eq!(json["report"]["facts"][0]["value"], "map.keys()");

    let back: AssertionFailure = serde_json::from_str(&failure.to_json()?)?;
    assert_eq!(back, failure);
    Ok(())
}

#[test]
fn test_exception_trace_survives_serialization() -> Result<()> {
    init_logging();
    let expect = ExpectFailure::new();
    expect
        .that(&mapping! { 1 => Value::Null })
        .comparing_values_using(case_insensitive())
        .contains_entry(1, "ONE");
    let failure = expect.failure().expect("should fail");

    let json = failure.report().to_json()?;
    let back: FailureReport = serde_json::from_str(&json)?;
    let recorded = back
        .exceptions()
        .first(Phase::Compare)
        .expect("compare failure recorded");
    assert_eq!(recorded.actual, Value::Null);
    assert_eq!(recorded.expected, Value::from("ONE"));
    assert_eq!(recorded.error.kind(), "NullValue");
    Ok(())
}

#[test]
fn test_verify() {
    let expect = ExpectFailure::new();
    expect.that(&mapping! { "jan" => 1 }).contains_key("jan");
    assert!(expect.verify().is_ok());

    expect.that(&mapping! { "jan" => 1 }).is_empty();
    expect.that(&mapping! { "jan" => 1 }).contains_key("feb");
    let err = expect.verify().expect_err("two assertions failed");
    assert_eq!(err.to_string(), "2 assertion(s) failed");
    let first = err
        .downcast_ref::<AssertionFailure>()
        .expect("the first failure is attached");
    assert_eq!(first.fact_keys(), vec!["expected to be empty", "but was"]);

    assert_eq!(expect.to_string(), "ExpectFailure(2 failures)");
    expect.clear();
    assert!(expect.verify().is_ok());
}

#[test]
fn test_custom_strategy() {
    use std::cell::Cell;

    #[derive(Default)]
    struct Counting(Cell<usize>);

    impl FailureStrategy for Counting {
        fn fail(&self, _failure: AssertionFailure) {
            self.0.set(self.0.get() + 1);
        }
    }

    let counting = Counting::default();
    let actual = mapping! { "jan" => 1 };
    let subject = AssertionBuilder::with_strategy(&counting).that(&actual);
    subject.contains_key("feb");
    subject.is_empty();
    subject.contains_entry("jan", 1);
    assert_eq!(counting.0.get(), 2);
}

#[test]
fn test_compare_error_display() {
    assert_eq!(
        CompareError::type_mismatch("i32", &Value::from("x")).to_string(),
        "expected a value of type i32 but got x (String)"
    );
    assert_eq!(CompareError::failed("boom").kind(), "Failed");
}
