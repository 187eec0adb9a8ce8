use super::{Context, Ordered, Relation, check_containment};
use crate::correspondence::{Correspondence, ExceptionTrace, Phase};
use crate::error::UsageError;
use crate::mapping::{MapLike, Mapping, bracketed};
use crate::reconcile::{Containment, expected_from_flat};
use crate::report::{Fact, FailureReport, exception_facts};
use crate::value::Value;

/// Assertions about a map whose values are matched through a
/// [`Correspondence`]. Keys are still matched by equality.
///
/// Created by [`MapSubject::comparing_values_using`](super::MapSubject::comparing_values_using).
pub struct ComparingValues<'a> {
    ctx: Context<'a>,
    correspondence: Correspondence,
}

impl<'a> ComparingValues<'a> {
    pub(crate) fn new(ctx: Context<'a>, correspondence: Correspondence) -> Self {
        Self {
            ctx,
            correspondence,
        }
    }

    fn entry_clause(&self, key: &Value, value: &Value) -> String {
        format!(
            "an entry with key <{key}> and a value that {} <{value}>",
            self.correspondence.description()
        )
    }

    /// Fails unless the map holds `key` with a value that corresponds to
    /// `value`.
    ///
    /// When the key is absent every actual value is tried against `value`,
    /// so the report can name the keys it is mapped under instead.
    pub fn contains_entry(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let (key, value) = (key.into(), value.into());
        let actual = self.ctx.actual();
        let mut trace = ExceptionTrace::new();
        let headline = format!(
            "Not true that {} contains {}",
            self.ctx.label(),
            self.entry_clause(&key, &value)
        );

        let line = if let Some(found) = actual.get(&key) {
            if self.correspondence.safe_compare(found, &value, &mut trace) {
                return;
            }
            let diff = self
                .correspondence
                .safe_format_diff(found, &value, &mut trace)
                .map(|d| format!(" (diff: {d})"))
                .unwrap_or_default();
            format!("{headline}. However, it has a mapping from that key to <{found}>{diff}")
        } else {
            let keys: Vec<&Value> = actual
                .iter()
                .filter(|e| self.correspondence.safe_compare(&e.value, &value, &mut trace))
                .map(|e| &e.key)
                .collect();
            if keys.is_empty() {
                headline
            } else {
                format!(
                    "{headline}. However, the following keys are mapped to such values: <{}>",
                    bracketed(keys)
                )
            }
        };

        self.ctx.fail(
            FailureReport::new()
                .with(Fact::simple(line))
                .with_exceptions(trace),
        );
    }

    /// Fails if the map holds `key` with a value that corresponds to
    /// `value`.
    ///
    /// A comparison that fails to produce an answer also fails the
    /// assertion: it cannot be shown that the forbidden entry is absent.
    pub fn does_not_contain_entry(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let (key, value) = (key.into(), value.into());
        let actual = self.ctx.actual();
        let Some(found) = actual.get(&key) else {
            return;
        };

        let mut trace = ExceptionTrace::new();
        let matched = self.correspondence.safe_compare(found, &value, &mut trace);
        if trace.count(Phase::Compare) > 0 {
            let mut facts = exception_facts(&trace, false);
            facts.extend([
                Fact::simple(format!(
                    "comparing contents by testing that no entry had the forbidden key \
                     and a value that {} the forbidden value",
                    self.correspondence.description()
                )),
                Fact::new("forbidden key", &key),
                Fact::new("forbidden value", &value),
                Fact::new("but was", actual),
            ]);
            self.ctx.fail(FailureReport::of(facts).with_trace(trace));
        } else if matched {
            let line = format!(
                "Not true that {} does not contain {}. It maps that key to <{found}>",
                self.ctx.label(),
                self.entry_clause(&key, &value)
            );
            self.ctx.fail(FailureReport::new().with(Fact::simple(line)));
        }
    }

    /// # Errors
    ///
    /// A [`UsageError`] for an odd number of arguments or a repeated key.
    pub fn contains_exactly(
        &self,
        entries: impl IntoIterator<Item = Value>,
    ) -> Result<Ordered<'a>, UsageError> {
        let expected = expected_from_flat(entries.into_iter().collect(), "contains_exactly")?;
        Ok(self.contains(expected, Containment::Exact))
    }

    pub fn contains_exactly_entries_in<M: MapLike + ?Sized>(&self, expected: &M) -> Ordered<'a> {
        self.contains(expected.to_mapping(), Containment::Exact)
    }

    /// # Errors
    ///
    /// A [`UsageError`] for an odd number of arguments or a repeated key.
    pub fn contains_at_least(
        &self,
        entries: impl IntoIterator<Item = Value>,
    ) -> Result<Ordered<'a>, UsageError> {
        let expected = expected_from_flat(entries.into_iter().collect(), "contains_at_least")?;
        Ok(self.contains(expected, Containment::AtLeast))
    }

    pub fn contains_at_least_entries_in<M: MapLike + ?Sized>(&self, expected: &M) -> Ordered<'a> {
        self.contains(expected.to_mapping(), Containment::AtLeast)
    }

    fn contains(&self, expected: Mapping, mode: Containment) -> Ordered<'a> {
        check_containment(
            &self.ctx,
            expected,
            &self.correspondence,
            mode,
            Relation::corresponding(mode, &self.correspondence),
            false,
        )
    }
}
