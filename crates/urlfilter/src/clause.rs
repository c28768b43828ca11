//! Clause types for compiled filter predicates.
//!
//! A [`Clause`] is one active criterion lowered to a field name, an
//! operator and an owned comparison value. The evaluator works on clauses
//! only, so it never sees absent criteria.

use std::sync::Arc;

use crate::op::Op;
use crate::value::{Number, Value};

/// A single filter predicate.
///
/// ```
/// use urlfilter::{Clause, ClauseValue, Op, Value};
///
/// let clause = Clause::new("Region", Op::Contains, "Tok");
/// assert!(clause.matches(&Value::Text("Tokyo")));
/// assert!(!clause.matches(&Value::Missing));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// The record field to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ClauseValue,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates this clause against a field value.
    ///
    /// A missing field never matches. Numeric clauses read text fields
    /// through [`Value::to_number`], so unparsable text counts as missing.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (_, Value::Missing) => false,

            (ClauseValue::Text(pattern), Value::Text(s)) => self.match_text(s, pattern),

            (ClauseValue::Text(pattern), Value::Number(n)) => {
                self.match_text(&n.to_string(), pattern)
            }

            (ClauseValue::Number(threshold), value) => match value.to_number() {
                Some(n) => self.op.eval_ordering(n.cmp(threshold)),
                None => false,
            },
        }
    }

    fn match_text(&self, field: &str, pattern: &str) -> bool {
        match self.op {
            Op::Contains => field.contains(pattern),
            Op::Eq => field == pattern,
            Op::Gte => false,
        }
    }
}

/// Owned value stored in a clause.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseValue {
    /// Text pattern. Shares its allocation with the filter state.
    Text(Arc<str>),
    /// Numeric threshold.
    Number(Number),
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::Text(Arc::from(s))
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::Text(Arc::from(s))
    }
}

impl From<Arc<str>> for ClauseValue {
    fn from(s: Arc<str>) -> Self {
        ClauseValue::Text(s)
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}
