//! Comparison operators for compiled clauses.

use std::cmp::Ordering;

/// Comparison operator for a clause.
///
/// - **Text**: `Contains`, `Eq`
/// - **Numeric**: `Gte`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Text contains substring (case-sensitive).
    Contains,
    /// Exact text equality.
    Eq,
    /// Greater than or equal.
    Gte,
}

impl Op {
    /// Returns `true` if this operator applies to text values.
    pub fn is_text_op(self) -> bool {
        matches!(self, Op::Contains | Op::Eq)
    }

    /// Returns `true` if this operator applies to numeric values.
    pub fn is_number_op(self) -> bool {
        matches!(self, Op::Gte)
    }

    /// Evaluates a comparison given an ordering result.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Gte => ordering != Ordering::Less,
            Op::Contains => false,
        }
    }

    /// Returns the display name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Contains => "contains",
            Op::Eq => "eq",
            Op::Gte => "gte",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
