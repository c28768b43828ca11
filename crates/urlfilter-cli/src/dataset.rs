//! Loading datasets from JSON.
//!
//! A dataset is a JSON array of flat objects. Every value is kept as text:
//! strings verbatim, numbers and booleans in their JSON spelling, `null` as
//! a missing value. Nested arrays and objects are rejected.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use urlfilter::{Filterable, Value};

/// The survey sample bundled with the binary.
const SAMPLE: &str = include_str!("../data/survey.json");

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("failed to read dataset {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The contents are not an array of flat objects.
    #[error("invalid dataset {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Flag(b) => b.to_string(),
        }
    }
}

/// One row of a dataset: field name to optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, Option<Scalar>>")]
pub struct Record {
    fields: BTreeMap<String, Option<String>>,
}

impl Record {
    /// Builds a record from `(field, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.map(Into::into)))
            .collect();
        Record { fields }
    }

    /// The value of `field`, or `None` if missing or `null`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Option::as_deref)
    }

    /// Field names, sorted.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, Option<Scalar>>> for Record {
    fn from(map: BTreeMap<String, Option<Scalar>>) -> Self {
        let fields = map
            .into_iter()
            .map(|(k, v)| (k, v.map(String::from)))
            .collect();
        Record { fields }
    }
}

impl Filterable for Record {
    fn field_value(&self, field: &str) -> Value<'_> {
        self.get(field).into()
    }
}

/// Parses a dataset from JSON text. `origin` names the source in errors.
pub fn parse(json: &str, origin: &str) -> Result<Vec<Record>, DatasetError> {
    serde_json::from_str(json).map_err(|source| DatasetError::Parse {
        origin: origin.to_string(),
        source,
    })
}

/// Loads a dataset file.
pub fn load(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let json = fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse(&json, &path.display().to_string())?;
    debug!(path = %path.display(), records = records.len(), "loaded dataset");
    Ok(records)
}

/// The bundled survey sample.
pub fn sample() -> Result<Vec<Record>, DatasetError> {
    parse(SAMPLE, "<bundled sample>")
}
