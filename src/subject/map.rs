use super::{ComparingValues, Context, Ordered, Relation, check_containment};
use crate::ambiguity::{Annotations, colliding, list_with_types};
use crate::correspondence::Correspondence;
use crate::error::UsageError;
use crate::failure::FailureStrategy;
use crate::mapping::{Entry, MapLike, Mapping, bracketed};
use crate::reconcile::{Containment, expected_from_flat, reconcile_exact};
use crate::report::{self, Fact, FailureReport};
use crate::value::Value;

/// Assertions about a map, comparing values by equality.
///
/// Created by [`assert_that`](crate::assert_that) or
/// [`ExpectFailure::that`](crate::ExpectFailure::that). The actual map is
/// snapshotted once at creation.
pub struct MapSubject<'a> {
    ctx: Context<'a>,
    actual: &'a dyn MapLike,
}

impl<'a> MapSubject<'a> {
    pub(crate) fn new(
        strategy: &'a dyn FailureStrategy,
        message: Option<String>,
        actual: &'a dyn MapLike,
    ) -> Self {
        Self {
            ctx: Context::new(strategy, message, actual.to_mapping()),
            actual,
        }
    }

    /// Name the subject in failure messages: `name (<{...}>)`.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.ctx.name = Some(name.into());
        self
    }

    fn facts(&self, facts: Vec<Fact>) {
        self.ctx.fail(FailureReport::of(facts));
    }

    /// Fails unless the actual map's own equality accepts `expected`.
    ///
    /// The outcome is decided by [`MapLike::eq_mapping`] alone. The entry
    /// reconciliation only shapes the message.
    pub fn is_equal_to<M: MapLike + ?Sized>(&self, expected: &M) {
        let expected = expected.to_mapping();
        if self.actual.eq_mapping(&expected) {
            return;
        }

        let actual = self.ctx.actual();
        let result = reconcile_exact(actual, &expected, &Correspondence::equality());
        if result.is_success() {
            let line = format!(
                "{}. It is equal according to structural map equality, \
                 but this implementation returned false",
                report::headline(&self.ctx.label(), "is equal to", &expected)
            );
            self.facts(vec![Fact::simple(line)]);
        } else {
            self.ctx.fail(report::containment_failure(
                &self.ctx.label(),
                "is equal to",
                actual,
                &expected,
                &result,
                true,
            ));
        }
    }

    /// Fails if the actual map's own equality accepts `unexpected`.
    pub fn is_not_equal_to<M: MapLike + ?Sized>(&self, unexpected: &M) {
        let unexpected = unexpected.to_mapping();
        if self.actual.eq_mapping(&unexpected) {
            self.facts(vec![
                Fact::new("expected not to be", &unexpected),
                Fact::new("but was", self.ctx.actual()),
            ]);
        }
    }

    pub fn is_empty(&self) {
        if !self.ctx.actual().is_empty() {
            self.facts(vec![
                Fact::simple("expected to be empty"),
                Fact::new("but was", self.ctx.actual()),
            ]);
        }
    }

    pub fn is_not_empty(&self) {
        if self.ctx.actual().is_empty() {
            self.facts(vec![Fact::simple("expected not to be empty")]);
        }
    }

    /// # Errors
    ///
    /// [`UsageError::NegativeSize`] if `expected` is negative.
    pub fn has_size(&self, expected: i64) -> Result<(), UsageError> {
        if expected < 0 {
            return Err(UsageError::NegativeSize(expected));
        }
        let actual = self.ctx.actual();
        if usize::try_from(expected).ok() != Some(actual.len()) {
            self.facts(vec![
                Fact::new("value of", "map.size()"),
                Fact::new("expected", expected),
                Fact::new("but was", actual.len()),
                Fact::new("map was", actual),
            ]);
        }
        Ok(())
    }

    pub fn contains_key(&self, key: impl Into<Value>) {
        let key = key.into();
        let actual = self.ctx.actual();
        if actual.contains_key(&key) {
            return;
        }

        let lookalikes = colliding(actual.keys(), &key);
        let mut facts = vec![
            Fact::new("value of", "map.keys()"),
            Fact::new("expected to contain", &key),
        ];
        if lookalikes.is_empty() {
            facts.push(Fact::new("but was", actual.keys_display()));
        } else {
            facts.extend([
                Fact::new("an instance of", key.type_name()),
                Fact::simple("but did not"),
                Fact::new("though it did contain", list_with_types(&lookalikes)),
                Fact::new("full contents", actual.keys_display()),
            ]);
        }
        facts.push(Fact::new("map was", actual));
        self.facts(facts);
    }

    pub fn does_not_contain_key(&self, key: impl Into<Value>) {
        let key = key.into();
        let actual = self.ctx.actual();
        if actual.contains_key(&key) {
            self.facts(vec![
                Fact::new("value of", "map.keys()"),
                Fact::new("expected not to contain", &key),
                Fact::new("but was", actual.keys_display()),
                Fact::new("map was", actual),
            ]);
        }
    }

    /// Fails unless the map holds `key` mapped to exactly `value`.
    ///
    /// A present key with another value is reported as such, with both
    /// values. An absent key is reported with whatever near misses the map
    /// holds: keys or values that only look alike, or other keys mapped to
    /// the value.
    pub fn contains_entry(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let entry = Entry::new(key, value);
        let actual = self.ctx.actual();
        match actual.get(&entry.key) {
            Some(found) if *found == entry.value => {}
            Some(found) => {
                let values = Annotations::scan([found, &entry.value]);
                self.facts(vec![
                    Fact::simple("key is present but with a different value"),
                    Fact::new("value of", format!("map.get({})", entry.key)),
                    Fact::new("expected", values.render(&entry.value)),
                    Fact::new("but was", values.render(found)),
                    Fact::new("map was", actual),
                ]);
            }
            None => self.facts(vec![Fact::simple(self.absent_entry(&entry))]),
        }
    }

    fn absent_entry(&self, entry: &Entry) -> String {
        let actual = self.ctx.actual();
        let base = format!("Not true that {} contains entry", self.ctx.label());
        let typed_entry = format!(
            "<{entry} (entry<{}, {}>)>",
            entry.key.type_name(),
            entry.value.type_name()
        );

        let keys = colliding(actual.keys(), &entry.key);
        if !keys.is_empty() {
            return format!(
                "{base} {typed_entry}. However, it does contain keys <{}>.",
                list_with_types(&keys)
            );
        }
        let values = colliding(actual.values(), &entry.value);
        if !values.is_empty() {
            return format!(
                "{base} {typed_entry}. However, it does contain values <{}>.",
                list_with_types(&values)
            );
        }
        let mapped: Vec<&Value> = actual
            .iter()
            .filter(|e| e.value == entry.value)
            .map(|e| &e.key)
            .collect();
        if mapped.is_empty() {
            format!("{base} <{entry}>")
        } else {
            format!(
                "{base} <{entry}>. However, the following keys are mapped to <{}>: {}",
                entry.value,
                bracketed(mapped)
            )
        }
    }

    pub fn does_not_contain_entry(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let entry = Entry::new(key, value);
        let actual = self.ctx.actual();
        if actual.get(&entry.key) == Some(&entry.value) {
            self.facts(vec![
                Fact::new("value of", "map.entries()"),
                Fact::new("expected not to contain", &entry),
                Fact::new("but was", actual.entries_display()),
            ]);
        }
    }

    /// Fails unless the map holds exactly the given `key, value, ...` pairs.
    ///
    /// # Errors
    ///
    /// A [`UsageError`] for an odd number of arguments or a repeated key.
    /// Nothing is compared in that case.
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

    /// Fails unless the map holds at least the given `key, value, ...` pairs.
    ///
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
            &Correspondence::equality(),
            mode,
            Relation::equality(mode),
            true,
        )
    }

    /// Compare values through `correspondence` instead of equality. Keys
    /// are still matched by equality.
    #[must_use]
    pub fn comparing_values_using(&self, correspondence: Correspondence) -> ComparingValues<'a> {
        ComparingValues::new(self.ctx.clone(), correspondence)
    }
}

