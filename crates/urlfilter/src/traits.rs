//! Record access.
//!
//! The evaluator reads records through [`Filterable`]. Any type that can
//! map a field name to a [`Value`] can be filtered.

use std::collections::{BTreeMap, HashMap};

use crate::value::Value;

/// Trait for records that can be filtered.
///
/// # Example
///
/// ```
/// use urlfilter::{Filterable, Value};
///
/// struct Office {
///     region: String,
///     sales: Option<String>,
/// }
///
/// impl Filterable for Office {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "Region" => Value::Text(&self.region),
///             "Sales" => self.sales.as_deref().into(),
///             _ => Value::Missing,
///         }
///     }
/// }
///
/// let office = Office { region: "Tokyo".into(), sales: Some("500".into()) };
/// assert_eq!(office.field_value("Sales"), Value::Text("500"));
/// ```
pub trait Filterable {
    /// Returns the value of a field, or [`Value::Missing`] if the field is
    /// absent, null, or unknown.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Returns an accessor function suitable for [`FilterEvaluator::filter`].
    ///
    /// [`FilterEvaluator::filter`]: crate::FilterEvaluator::filter
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

impl Filterable for BTreeMap<String, String> {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.get(field).map(String::as_str).into()
    }
}

impl Filterable for BTreeMap<String, Option<String>> {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.get(field).and_then(Option::as_deref).into()
    }
}

impl Filterable for HashMap<String, Option<String>> {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.get(field).and_then(Option::as_deref).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn btree_map_records() {
        let mut record: BTreeMap<String, Option<String>> = BTreeMap::new();
        record.insert("Region".into(), Some("Tokyo".into()));
        record.insert("Sales".into(), None);

        assert_eq!(record.field_value("Region"), Value::Text("Tokyo"));
        assert_eq!(record.field_value("Sales"), Value::Missing);
        assert_eq!(record.field_value("Unknown"), Value::Missing);
    }

    #[test]
    fn accessor_delegates() {
        let mut record: BTreeMap<String, String> = BTreeMap::new();
        record.insert("Region".into(), "Osaka".into());
        assert_eq!(Filterable::accessor(&record, "Region"), Value::Text("Osaka"));
    }
}
