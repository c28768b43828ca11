//! Runtime value types for field comparison.
//!
//! The [`Value`] enum represents the value of a record field at evaluation
//! time. [`Number`] is the finite numeric type shared by record fields and
//! numeric thresholds.

use std::cmp::Ordering;
use std::fmt;

/// Runtime value for comparison, borrowed from the source record.
///
/// Survey data often stores numbers as text, so a numeric criterion coerces
/// [`Value::Text`] through [`Number::parse`] at comparison time.
///
/// # Example
///
/// ```
/// use urlfilter::{Value, Number};
///
/// struct Office {
///     region: String,
///     staff: Option<String>,
/// }
///
/// fn accessor<'a>(office: &'a Office, field: &str) -> Value<'a> {
///     match field {
///         "region" => Value::Text(&office.region),
///         "staff" => office.staff.as_deref().map_or(Value::Missing, Value::Text),
///         _ => Value::Missing,
///     }
/// }
///
/// let office = Office { region: "Tokyo".into(), staff: None };
/// assert_eq!(accessor(&office, "region"), Value::Text("Tokyo"));
/// assert!(accessor(&office, "staff").is_missing());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Text value (borrowed).
    Text(&'a str),
    /// Numeric value.
    Number(Number),
    /// Field absent, null, or unknown.
    Missing,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `Missing` value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Extracts the text value, if present.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric reading of this value.
    ///
    /// Text is parsed with [`Number::parse`]; empty or non-numeric text
    /// yields `None`, the same as a missing field.
    pub fn to_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => Number::parse(s),
            Value::Missing => None,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for Value<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Value::Missing, Value::Text)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

/// A finite 64-bit float.
///
/// `NaN` and the infinities are unrepresentable, so every `Number` has a
/// total order and a stable textual form. Negative zero is folded into zero.
///
/// ```
/// use urlfilter::Number;
///
/// assert_eq!(Number::parse(" 400 ").map(Number::get), Some(400.0));
/// assert_eq!(Number::parse("abc"), None);
/// assert_eq!(Number::new(f64::NAN), None);
/// assert_eq!(Number::new(400.0).unwrap().to_string(), "400");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(f64);

impl Number {
    /// Zero.
    pub const ZERO: Number = Number(0.0);

    /// Wraps a float, rejecting `NaN` and infinities.
    pub fn new(n: f64) -> Option<Self> {
        if !n.is_finite() {
            return None;
        }
        // -0.0 == 0.0, this just normalizes the sign bit
        Some(Number(if n == 0.0 { 0.0 } else { n }))
    }

    /// Parses decimal text.
    ///
    /// Surrounding whitespace is ignored. Empty text, text that is not a
    /// number, and text that overflows to infinity all yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().and_then(Number::new)
    }

    /// Returns the wrapped float.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Returns `true` if the number has no fractional part.
    pub fn is_integral(self) -> bool {
        self.0.fract() == 0.0
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Number {
    /// Shortest text that parses back to the same number: `400`, `2.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number(f64::from(n))
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number(f64::from(n))
    }
}

impl TryFrom<f64> for Number {
    type Error = f64;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        Number::new(n).ok_or(n)
    }
}
