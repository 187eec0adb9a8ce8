//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use mapfacts::{CompareError, Correspondence, MapLike, Mapping, Value};

/// Route the crate's `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A string value that parses to the expected `i32`.
pub fn parses_to_integer() -> Correspondence {
    Correspondence::from_fn(
        |actual: &Value, expected: &Value| {
            let text = actual
                .as_str()
                .ok_or_else(|| CompareError::type_mismatch("String", actual))?;
            let Value::Int(want) = expected else {
                return Err(CompareError::type_mismatch("i32", expected));
            };
            Ok(text.parse::<i32>().is_ok_and(|n| n == *want))
        },
        "parses to",
    )
}

/// Case-insensitive string equality that rejects nulls.
pub fn case_insensitive() -> Correspondence {
    Correspondence::from_fn(
        |actual: &Value, expected: &Value| {
            if actual.is_null() || expected.is_null() {
                return Err(CompareError::null_value());
            }
            match (actual.as_str(), expected.as_str()) {
                (Some(a), Some(e)) => Ok(a.eq_ignore_ascii_case(e)),
                _ => Err(CompareError::failed("both values must be strings")),
            }
        },
        "equals (ignoring case)",
    )
}

/// Integers within 10 of each other, diffed as `actual - expected`.
pub fn within_10_of() -> Correspondence {
    fn ints(actual: &Value, expected: &Value) -> Result<(i64, i64), CompareError> {
        if actual.is_null() || expected.is_null() {
            return Err(CompareError::null_value());
        }
        let a = actual
            .as_i64()
            .ok_or_else(|| CompareError::type_mismatch("i32", actual))?;
        let e = expected
            .as_i64()
            .ok_or_else(|| CompareError::type_mismatch("i32", expected))?;
        Ok((a, e))
    }

    Correspondence::from_fn(
        |actual: &Value, expected: &Value| {
            let (a, e) = ints(actual, expected)?;
            Ok((a - e).abs() <= 10)
        },
        "is within 10 of",
    )
    .formatting_diffs_using(|actual: &Value, expected: &Value| {
        let (a, e) = ints(actual, expected)?;
        Ok(Some((a - e).to_string()))
    })
}

/// A map whose own equality ignores its contents.
pub struct BrokenMap {
    entries: Mapping,
    equals: bool,
}

impl BrokenMap {
    pub fn always_equal(entries: Mapping) -> Self {
        Self {
            entries,
            equals: true,
        }
    }

    pub fn never_equal(entries: Mapping) -> Self {
        Self {
            entries,
            equals: false,
        }
    }
}

impl MapLike for BrokenMap {
    fn to_mapping(&self) -> Mapping {
        self.entries.clone()
    }

    fn eq_mapping(&self, _other: &Mapping) -> bool {
        self.equals
    }
}
