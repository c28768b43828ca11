//! The active filter criteria of a mounted view.
//!
//! [`FilterState`] holds one optional [`CriterionValue`] per schema entry.
//! It never rejects input: empty text, unparsable numbers and non-finite
//! floats all normalize to "absent". Updates produce a new state that
//! shares every untouched text value with the previous one, so callers can
//! detect what changed by identity with [`FilterState::changed_keys`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::criterion::{CriterionKind, CriterionSpec, Schema};
use crate::value::Number;

/// A present criterion value.
#[derive(Debug, Clone, PartialEq)]
pub enum CriterionValue {
    /// Non-empty text.
    Text(Arc<str>),
    /// Finite number.
    Number(Number),
}

impl CriterionValue {
    /// Extracts the text value, if present.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CriterionValue::Text(s) => Some(s),
            CriterionValue::Number(_) => None,
        }
    }

    /// Extracts the numeric value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            CriterionValue::Number(n) => Some(*n),
            CriterionValue::Text(_) => None,
        }
    }

    /// The text written to the query string for this value.
    pub fn to_param(&self) -> Cow<'_, str> {
        match self {
            CriterionValue::Text(s) => Cow::Borrowed(s),
            CriterionValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    fn same_identity(&self, other: &CriterionValue) -> bool {
        match (self, other) {
            (CriterionValue::Text(a), CriterionValue::Text(b)) => Arc::ptr_eq(a, b),
            (CriterionValue::Number(a), CriterionValue::Number(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for CriterionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

/// A user edit to one criterion, before normalization.
///
/// Conversions cover the common input shapes: `&str`/`String` for raw
/// field text, `f64` for typed numeric input, and `Option<_>` where `None`
/// clears the criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Remove the criterion.
    Clear,
    /// Raw text as typed or read from a URL.
    Text(String),
    /// A numeric input reading. `NaN` means the input is not a number.
    Number(f64),
}

impl From<&str> for Edit {
    fn from(s: &str) -> Self {
        Edit::Text(s.to_string())
    }
}

impl From<String> for Edit {
    fn from(s: String) -> Self {
        Edit::Text(s)
    }
}

impl From<f64> for Edit {
    fn from(n: f64) -> Self {
        Edit::Number(n)
    }
}

impl From<Number> for Edit {
    fn from(n: Number) -> Self {
        Edit::Number(n.get())
    }
}

impl<T: Into<Edit>> From<Option<T>> for Edit {
    fn from(value: Option<T>) -> Self {
        value.map_or(Edit::Clear, Into::into)
    }
}

/// Normalizes an edit for a criterion. `None` means absent.
fn normalize(spec: &CriterionSpec, edit: Edit) -> Option<CriterionValue> {
    match (spec.kind, edit) {
        (_, Edit::Clear) => None,
        (CriterionKind::Text { .. }, Edit::Text(s)) => {
            if s.is_empty() {
                None
            } else {
                Some(CriterionValue::Text(Arc::from(s)))
            }
        }
        (CriterionKind::Text { .. }, Edit::Number(n)) => {
            Number::new(n).map(|n| CriterionValue::Text(Arc::from(n.to_string())))
        }
        (CriterionKind::Min, Edit::Text(s)) => Number::parse(&s).map(CriterionValue::Number),
        (CriterionKind::Min, Edit::Number(n)) => Number::new(n).map(CriterionValue::Number),
    }
}

/// The full set of currently active criterion values.
///
/// ```
/// use std::sync::Arc;
/// use urlfilter::{CriterionSpec, FilterState, Schema};
///
/// let schema = Arc::new(Schema::new([
///     CriterionSpec::text("region", "Region"),
///     CriterionSpec::min("minSales", "Sales"),
/// ]).unwrap());
///
/// let state = FilterState::from_query_pairs(
///     schema,
///     [("region", "Tokyo"), ("minSales", "abc")],
/// );
/// assert_eq!(state.text("region"), Some("Tokyo"));
/// assert!(!state.is_active("minSales"));
///
/// let state = state.update("minSales", "400");
/// assert_eq!(state.number("minSales").map(|n| n.get()), Some(400.0));
/// ```
#[derive(Debug, Clone)]
pub struct FilterState {
    schema: Arc<Schema>,
    entries: Vec<Option<CriterionValue>>,
}

impl FilterState {
    /// Creates a state with every criterion absent.
    pub fn new(schema: Arc<Schema>) -> Self {
        let entries = vec![None; schema.len()];
        FilterState { schema, entries }
    }

    /// Builds the initial state from decoded query pairs.
    ///
    /// Keys outside the schema are ignored. When a key repeats, the last
    /// occurrence wins, even if it normalizes to absent.
    pub fn from_query_pairs<K, V, I>(schema: Arc<Schema>, pairs: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut state = FilterState::new(schema);
        for (key, raw) in pairs {
            let key = key.as_ref();
            match state.schema.position(key) {
                Some(index) => {
                    let spec = &state.schema.specs()[index];
                    state.entries[index] = normalize(spec, Edit::Text(raw.as_ref().to_string()));
                }
                None => debug!(key, "ignoring unknown query parameter"),
            }
        }
        state
    }

    /// Returns a new state with one criterion changed.
    ///
    /// Every other entry is shared with `self`. An edit that normalizes to
    /// the current value keeps the current allocation too. Unknown keys
    /// leave the state unchanged.
    pub fn update(&self, key: &str, edit: impl Into<Edit>) -> FilterState {
        let mut next = self.clone();
        let Some(index) = self.schema.position(key) else {
            debug!(key, "ignoring edit for unknown criterion");
            return next;
        };
        let value = normalize(&self.schema.specs()[index], edit.into());
        if value != self.entries[index] {
            next.entries[index] = value;
        }
        next
    }

    /// Returns a state with every criterion absent, sharing the schema.
    pub fn clear_all(&self) -> FilterState {
        FilterState::new(Arc::clone(&self.schema))
    }

    /// The schema this state is keyed by.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the value of a criterion, if present.
    pub fn get(&self, key: &str) -> Option<&CriterionValue> {
        self.schema
            .position(key)
            .and_then(|index| self.entries[index].as_ref())
    }

    /// Returns the text value of a criterion, if present.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(CriterionValue::as_text)
    }

    /// Returns the numeric value of a criterion, if present.
    pub fn number(&self, key: &str) -> Option<Number> {
        self.get(key).and_then(CriterionValue::as_number)
    }

    /// Returns `true` if the criterion is present.
    pub fn is_active(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of present criteria.
    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    /// Returns `true` if no criterion is present.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    /// Iterates over present criteria in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&CriterionSpec, &CriterionValue)> {
        self.schema
            .iter()
            .zip(&self.entries)
            .filter_map(|(spec, entry)| entry.as_ref().map(|value| (spec, value)))
    }

    /// Keys whose entries are not shared between `self` and `other`.
    ///
    /// Comparison is by identity for text values, so an entry rebuilt from
    /// equal text still counts as changed. States built on different
    /// schemas report every key.
    pub fn changed_keys<'a>(&'a self, other: &FilterState) -> Vec<&'a str> {
        let same_schema = Arc::ptr_eq(&self.schema, &other.schema) || self.schema == other.schema;
        self.schema
            .iter()
            .enumerate()
            .filter(|(index, _)| {
                if !same_schema {
                    return true;
                }
                match (&self.entries[*index], &other.entries[*index]) {
                    (None, None) => false,
                    (Some(a), Some(b)) => !a.same_identity(b),
                    _ => true,
                }
            })
            .map(|(_, spec)| spec.key.as_str())
            .collect()
    }
}

impl PartialEq for FilterState {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.schema, &other.schema) || self.schema == other.schema)
            && self.entries == other.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new([
                CriterionSpec::text("region", "Region"),
                CriterionSpec::text("industry", "Industry"),
                CriterionSpec::min("minSales", "Sales"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn new_state_is_empty() {
        let state = FilterState::new(schema());
        assert!(state.is_empty());
        assert_eq!(state.active_count(), 0);
        assert_eq!(state.iter().count(), 0);
    }

    #[test]
    fn init_from_pairs() {
        let state = FilterState::from_query_pairs(
            schema(),
            [("region", "Tokyo"), ("minSales", "400"), ("page", "3")],
        );
        assert_eq!(state.text("region"), Some("Tokyo"));
        assert_eq!(state.number("minSales"), Some(Number::from(400)));
        assert!(!state.is_active("industry"));
        assert_eq!(state.active_count(), 2);
    }

    #[test]
    fn init_normalizes_malformed_values() {
        let state = FilterState::from_query_pairs(
            schema(),
            [("region", ""), ("minSales", "abc"), ("industry", " ")],
        );
        assert!(!state.is_active("region"));
        assert!(!state.is_active("minSales"));
        // text is stored verbatim, whitespace included
        assert_eq!(state.text("industry"), Some(" "));
    }

    #[test]
    fn init_last_occurrence_wins() {
        let state = FilterState::from_query_pairs(
            schema(),
            [("region", "Tokyo"), ("region", "Osaka"), ("minSales", "5"), ("minSales", "x")],
        );
        assert_eq!(state.text("region"), Some("Osaka"));
        assert!(!state.is_active("minSales"));
    }

    #[test]
    fn update_normalizes_to_absent() {
        let state = FilterState::from_query_pairs(schema(), [("region", "Tokyo"), ("minSales", "1")]);

        assert!(!state.update("region", "").is_active("region"));
        assert!(!state.update("region", Edit::Clear).is_active("region"));
        assert!(!state.update("region", None::<&str>).is_active("region"));
        assert!(!state.update("minSales", f64::NAN).is_active("minSales"));
        assert!(!state.update("minSales", "").is_active("minSales"));
        assert!(!state.update("minSales", "1.2.3").is_active("minSales"));
    }

    #[test]
    fn zero_threshold_is_present() {
        let state = FilterState::new(schema()).update("minSales", 0.0);
        assert_eq!(state.number("minSales"), Some(Number::ZERO));

        let cleared = state.update("minSales", "");
        assert!(!cleared.is_active("minSales"));
    }

    #[test]
    fn number_edit_on_text_criterion() {
        let state = FilterState::new(schema()).update("region", 12.0);
        assert_eq!(state.text("region"), Some("12"));
    }

    #[test]
    fn update_unknown_key_is_noop() {
        let state = FilterState::from_query_pairs(schema(), [("region", "Tokyo")]);
        let next = state.update("page", "2");
        assert_eq!(next, state);
        assert!(next.changed_keys(&state).is_empty());
    }

    #[test]
    fn update_preserves_identity_of_other_entries() {
        let state = FilterState::from_query_pairs(
            schema(),
            [("region", "Tokyo"), ("industry", "Retail")],
        );
        let next = state.update("industry", "Retail trade");

        assert_eq!(next.changed_keys(&state), ["industry"]);
        match (state.get("region"), next.get("region")) {
            (Some(CriterionValue::Text(a)), Some(CriterionValue::Text(b))) => {
                assert!(Arc::ptr_eq(a, b))
            }
            other => panic!("unexpected entries: {other:?}"),
        }
    }

    #[test]
    fn update_to_equal_value_keeps_identity() {
        let state = FilterState::from_query_pairs(schema(), [("region", "Tokyo")]);
        let next = state.update("region", "Tokyo");
        assert!(next.changed_keys(&state).is_empty());
    }

    #[test]
    fn clear_all() {
        let state = FilterState::from_query_pairs(schema(), [("region", "Tokyo"), ("minSales", "1")]);
        let cleared = state.clear_all();
        assert!(cleared.is_empty());
        assert_eq!(cleared.changed_keys(&state), ["region", "minSales"]);
    }

    #[test]
    fn iter_follows_schema_order() {
        let state = FilterState::from_query_pairs(
            schema(),
            [("minSales", "10"), ("region", "Tokyo")],
        );
        let keys: Vec<&str> = state.iter().map(|(spec, _)| spec.key.as_str()).collect();
        assert_eq!(keys, ["region", "minSales"]);
    }

    #[test]
    fn criterion_value_params() {
        assert_eq!(CriterionValue::Text(Arc::from("a b")).to_param(), "a b");
        assert_eq!(CriterionValue::Number(Number::from(400)).to_param(), "400");
        assert_eq!(CriterionValue::Number(Number::new(0.5).unwrap()).to_string(), "0.5");
    }
}
