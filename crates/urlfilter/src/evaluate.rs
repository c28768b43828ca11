//! Evaluating a filter state against a dataset.
//!
//! A [`FilterEvaluator`] compiles the present criteria of a [`FilterState`]
//! into [`Clause`]s once, then tests records against all of them:
//!
//! ```text
//! match = every clause matches        (no clauses = everything matches)
//! ```
//!
//! Absent criteria compile to nothing, so they never constrain. Results keep
//! the dataset's order. The evaluator holds no memory between runs; callers
//! rebuild it whenever the state changes.

use tracing::trace;

use crate::clause::{Clause, ClauseValue};
use crate::criterion::{CriterionKind, TextMatch};
use crate::op::Op;
use crate::state::{CriterionValue, FilterState};
use crate::traits::Filterable;
use crate::value::Value;

/// Compiled conjunction of the active criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterEvaluator {
    clauses: Vec<Clause>,
}

impl FilterEvaluator {
    /// Compiles the present criteria of `state`.
    pub fn new(state: &FilterState) -> Self {
        let clauses = state
            .iter()
            .map(|(spec, value)| {
                let op = match spec.kind {
                    CriterionKind::Text {
                        matching: TextMatch::Contains,
                    } => Op::Contains,
                    CriterionKind::Text {
                        matching: TextMatch::Exact,
                    } => Op::Eq,
                    CriterionKind::Min => Op::Gte,
                };
                let value = match value {
                    CriterionValue::Text(s) => ClauseValue::Text(s.clone()),
                    CriterionValue::Number(n) => ClauseValue::Number(*n),
                };
                // the state stores text for text criteria and numbers for thresholds
                debug_assert!(match value {
                    ClauseValue::Text(_) => op.is_text_op(),
                    ClauseValue::Number(_) => op.is_number_op(),
                });
                Clause {
                    field: spec.field.clone(),
                    op,
                    value,
                }
            })
            .collect();
        FilterEvaluator { clauses }
    }

    /// The compiled clauses, in schema order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns `true` if no criterion is active (everything matches).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Tests a single item through an accessor function.
    pub fn matches_with<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.clauses
            .iter()
            .all(|clause| clause.matches(&accessor(item, &clause.field)))
    }

    /// Tests a single record.
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.matches(&record.field_value(&clause.field)))
    }

    /// Filters a slice through an accessor, keeping the original order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        items
            .iter()
            .filter(|item| self.matches_with(*item, &accessor))
            .collect()
    }

    /// Filters records, keeping the original order.
    pub fn evaluate<'a, R: Filterable>(&self, dataset: &'a [R]) -> Vec<&'a R> {
        let rows: Vec<&'a R> = dataset.iter().filter(|r| self.matches(*r)).collect();
        trace!(
            clauses = self.clauses.len(),
            total = dataset.len(),
            matched = rows.len(),
            "evaluated filter"
        );
        rows
    }

    /// Counts matching records.
    pub fn count<R: Filterable>(&self, dataset: &[R]) -> usize {
        dataset.iter().filter(|r| self.matches(*r)).count()
    }
}

/// Filters `dataset` by `state`, preserving order.
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use urlfilter::{evaluate, CriterionSpec, FilterState, Schema};
///
/// let schema = Arc::new(Schema::new([
///     CriterionSpec::text("region", "Region"),
///     CriterionSpec::min("minSales", "Sales"),
/// ]).unwrap());
///
/// let row = |region: &str, sales: Option<&str>| {
///     BTreeMap::from([
///         ("Region".to_string(), Some(region.to_string())),
///         ("Sales".to_string(), sales.map(str::to_string)),
///     ])
/// };
/// let data = vec![row("Tokyo", Some("500")), row("Osaka", None)];
///
/// let state = FilterState::new(schema).update("minSales", 0.0);
/// let rows = evaluate(&data, &state);
/// assert_eq!(rows.len(), 1);
/// ```
pub fn evaluate<'a, R: Filterable>(dataset: &'a [R], state: &FilterState) -> Vec<&'a R> {
    FilterEvaluator::new(state).evaluate(dataset)
}

/// Tests one record against `state`.
pub fn matches<R: Filterable + ?Sized>(record: &R, state: &FilterState) -> bool {
    FilterEvaluator::new(state).matches(record)
}

/// Counts records matching `state`.
pub fn count<R: Filterable>(dataset: &[R], state: &FilterState) -> usize {
    FilterEvaluator::new(state).count(dataset)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::criterion::{CriterionSpec, Schema};
    use crate::value::Number;

    #[derive(Debug, PartialEq)]
    struct Office {
        region: &'static str,
        industry: &'static str,
        sales: Option<&'static str>,
        staff: Option<u32>,
    }

    impl Filterable for Office {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "Region" => Value::Text(self.region),
                "Industry" => Value::Text(self.industry),
                "Sales" => self.sales.into(),
                "Staff" => self.staff.map_or(Value::Missing, |n| Value::Number(n.into())),
                _ => Value::Missing,
            }
        }
    }

    fn offices() -> Vec<Office> {
        vec![
            Office {
                region: "Tokyo",
                industry: "Retail trade",
                sales: Some("500"),
                staff: Some(40),
            },
            Office {
                region: "Osaka",
                industry: "Retail",
                sales: None,
                staff: Some(12),
            },
            Office {
                region: "Tokyo-West",
                industry: "Transport",
                sales: Some("120"),
                staff: None,
            },
            Office {
                region: "Nagoya",
                industry: "Retail trade",
                sales: Some("n/a"),
                staff: Some(0),
            },
        ]
    }

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new([
                CriterionSpec::text("region", "Region"),
                CriterionSpec::exact("industry", "Industry"),
                CriterionSpec::min("minSales", "Sales"),
                CriterionSpec::min("minStaff", "Staff"),
            ])
            .unwrap(),
        )
    }

    fn regions<'a>(rows: &[&'a Office]) -> Vec<&'a str> {
        rows.iter().map(|o| o.region).collect()
    }

    #[test]
    fn empty_state_matches_all_in_order() {
        let data = offices();
        let state = FilterState::new(schema());
        let rows = evaluate(&data, &state);
        assert_eq!(regions(&rows), ["Tokyo", "Osaka", "Tokyo-West", "Nagoya"]);
        assert!(FilterEvaluator::new(&state).is_empty());
    }

    #[test]
    fn text_substring() {
        let data = offices();
        let state = FilterState::new(schema()).update("region", "Tokyo");
        assert_eq!(regions(&evaluate(&data, &state)), ["Tokyo", "Tokyo-West"]);
    }

    #[test]
    fn exact_text_variant() {
        let data = offices();
        let state = FilterState::new(schema()).update("industry", "Retail");
        assert_eq!(regions(&evaluate(&data, &state)), ["Osaka"]);
    }

    #[test]
    fn numeric_threshold_on_text_field() {
        let data = offices();
        let state = FilterState::new(schema()).update("minSales", "120");
        assert_eq!(regions(&evaluate(&data, &state)), ["Tokyo", "Tokyo-West"]);
    }

    #[test]
    fn numeric_threshold_on_number_field() {
        let data = offices();
        let state = FilterState::new(schema()).update("minStaff", 12.0);
        assert_eq!(regions(&evaluate(&data, &state)), ["Tokyo", "Osaka"]);
    }

    #[test]
    fn zero_threshold_excludes_missing_and_unparsable() {
        let data = offices();
        let state = FilterState::new(schema()).update("minSales", 0.0);
        assert_eq!(regions(&evaluate(&data, &state)), ["Tokyo", "Tokyo-West"]);

        let state = FilterState::new(schema()).update("minStaff", "0");
        assert_eq!(regions(&evaluate(&data, &state)), ["Tokyo", "Osaka", "Nagoya"]);
    }

    #[test]
    fn conjunction() {
        let data = offices();
        let state = FilterState::new(schema())
            .update("region", "Tokyo")
            .update("minSales", "200");
        assert_eq!(regions(&evaluate(&data, &state)), ["Tokyo"]);
        assert_eq!(count(&data, &state), 1);
        assert!(matches(&data[0], &state));
        assert!(!matches(&data[2], &state));
    }

    #[test]
    fn compiled_clauses() {
        let state = FilterState::new(schema())
            .update("minSales", "5")
            .update("industry", "Retail");
        let evaluator = FilterEvaluator::new(&state);
        assert_eq!(
            evaluator.clauses(),
            [
                Clause::new("Industry", Op::Eq, "Retail"),
                Clause::new("Sales", Op::Gte, Number::from(5)),
            ]
        );
    }

    #[test]
    fn clause_values_follow_operator_kind() {
        let state = FilterState::new(schema())
            .update("region", "1200")
            .update("industry", "Retail")
            .update("minSales", "abc")
            .update("minStaff", 3.0);
        let evaluator = FilterEvaluator::new(&state);
        for clause in evaluator.clauses() {
            match clause.value {
                ClauseValue::Text(_) => assert!(clause.op.is_text_op(), "{clause:?}"),
                ClauseValue::Number(_) => assert!(clause.op.is_number_op(), "{clause:?}"),
            }
        }
        // unparsable threshold text stays absent
        assert_eq!(evaluator.clauses().len(), 3);
    }

    #[test]
    fn filter_with_accessor() {
        let data = offices();
        let state = FilterState::new(schema()).update("region", "Osaka");
        let evaluator = FilterEvaluator::new(&state);
        let rows = evaluator.filter(&data, Office::accessor);
        assert_eq!(rows, vec![&data[1]]);
    }
}
