//! Criterion declarations.
//!
//! A [`CriterionSpec`] names one filterable field and the URL parameter
//! that carries its value. A [`Schema`] is the fixed, ordered set of specs
//! for a view; its order is the serialization order of the query string.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// How a text criterion compares against a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMatch {
    /// Case-sensitive substring containment.
    #[default]
    Contains,
    /// Case-sensitive equality.
    Exact,
}

/// The kind of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CriterionKind {
    /// Text filter. An empty value means "no filter".
    Text {
        #[serde(default, rename = "match")]
        matching: TextMatch,
    },
    /// Numeric minimum threshold: the field must be present and `>=` the value.
    Min,
}

impl CriterionKind {
    /// Returns `true` for text kinds.
    pub fn is_text(self) -> bool {
        matches!(self, CriterionKind::Text { .. })
    }

    /// Returns `true` for numeric kinds.
    pub fn is_numeric(self) -> bool {
        matches!(self, CriterionKind::Min)
    }
}

/// One filterable field.
///
/// ```
/// use urlfilter::{CriterionSpec, TextMatch, CriterionKind};
///
/// let region = CriterionSpec::text("region", "Region");
/// assert_eq!(region.kind, CriterionKind::Text { matching: TextMatch::Contains });
///
/// let sales = CriterionSpec::min("minSales", "Sales");
/// assert!(sales.kind.is_numeric());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CriterionSpec {
    /// URL parameter name. Stable across releases.
    pub key: String,
    /// Record field the criterion reads.
    pub field: String,
    /// Comparison kind.
    #[serde(flatten)]
    pub kind: CriterionKind,
}

impl CriterionSpec {
    /// Creates a criterion with an explicit kind.
    pub fn new(key: impl Into<String>, field: impl Into<String>, kind: CriterionKind) -> Self {
        CriterionSpec {
            key: key.into(),
            field: field.into(),
            kind,
        }
    }

    /// Substring text criterion.
    pub fn text(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(
            key,
            field,
            CriterionKind::Text {
                matching: TextMatch::Contains,
            },
        )
    }

    /// Exact-match text criterion.
    pub fn exact(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(
            key,
            field,
            CriterionKind::Text {
                matching: TextMatch::Exact,
            },
        )
    }

    /// Numeric minimum-threshold criterion.
    pub fn min(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(key, field, CriterionKind::Min)
    }
}

/// The ordered set of criteria for a view.
///
/// Keys are unique and non-empty. The declaration order is the order in
/// which present criteria are written to the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CriterionSpec>", into = "Vec<CriterionSpec>")]
pub struct Schema {
    specs: Vec<CriterionSpec>,
}

impl Schema {
    /// Builds a schema, rejecting empty and duplicate keys.
    pub fn new(specs: impl IntoIterator<Item = CriterionSpec>) -> Result<Self> {
        let specs: Vec<CriterionSpec> = specs.into_iter().collect();
        for (i, spec) in specs.iter().enumerate() {
            if spec.key.is_empty() {
                return Err(SchemaError::EmptyKey {
                    field: spec.field.clone(),
                });
            }
            if specs[..i].iter().any(|earlier| earlier.key == spec.key) {
                return Err(SchemaError::DuplicateKey(spec.key.clone()));
            }
        }
        Ok(Schema { specs })
    }

    /// Returns the declaration index of a key.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.key == key)
    }

    /// Looks up a criterion by key.
    pub fn get(&self, key: &str) -> Option<&CriterionSpec> {
        self.specs.iter().find(|spec| spec.key == key)
    }

    /// Returns `true` if the key names a criterion.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Returns the criteria in declaration order.
    pub fn specs(&self) -> &[CriterionSpec] {
        &self.specs
    }

    /// Iterates over the criteria in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, CriterionSpec> {
        self.specs.iter()
    }

    /// Iterates over the URL parameter names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| spec.key.as_str())
    }

    /// Number of criteria.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if the schema declares no criteria.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl TryFrom<Vec<CriterionSpec>> for Schema {
    type Error = SchemaError;

    fn try_from(specs: Vec<CriterionSpec>) -> Result<Self> {
        Schema::new(specs)
    }
}

impl From<Schema> for Vec<CriterionSpec> {
    fn from(schema: Schema) -> Self {
        schema.specs
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a CriterionSpec;
    type IntoIter = std::slice::Iter<'a, CriterionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}
