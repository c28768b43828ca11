//! Criterion schemas: the built-in survey schema and YAML schema files.
//!
//! A schema file is a YAML list of criteria:
//!
//! ```yaml
//! - key: region
//!   field: Region
//!   kind: text
//! - key: industry
//!   field: IndustryClassification
//!   kind: text
//!   match: exact
//! - key: minSales
//!   field: Sales
//!   kind: min
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use urlfilter::{CriterionKind, CriterionSpec, Schema, SchemaError, TextMatch};

/// Errors that can occur while loading a schema file.
#[derive(Debug, Error)]
pub enum SchemaFileError {
    #[error("failed to read schema {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Invalid(#[from] SchemaError),
}

/// Built-in survey columns: `(key, field, label, numeric)`.
const SURVEY: [(&str, &str, &str, bool); 8] = [
    ("region", "Region", "Region", false),
    (
        "industry",
        "IndustryClassification",
        "Industry Classification",
        false,
    ),
    (
        "businessActivitySales",
        "BusinessActivity_Sales_MillionYen",
        "Business Activity Sales (Million Yen)",
        true,
    ),
    (
        "establishmentSales",
        "EstablishmentCompany_Sales_MillionYen",
        "Establishment Company Sales (Million Yen)",
        true,
    ),
    (
        "totalEmployees",
        "EstablishmentCompany_TotalEmployees_People",
        "Total Employees (People)",
        true,
    ),
    (
        "dispatchers",
        "EstablishmentCompany_Dispatchers_People",
        "Dispatchers (People)",
        true,
    ),
    (
        "recipients",
        "EstablishmentCompany_Recipients_People",
        "Recipients (People)",
        true,
    ),
    (
        "workers",
        "EstablishmentCompany_Workers_People",
        "Workers (People)",
        true,
    ),
];

/// The schema of the bundled survey dataset.
pub fn survey() -> Result<Schema, SchemaError> {
    let specs = SURVEY.iter().map(|&(key, field, _, numeric)| {
        if numeric {
            CriterionSpec::min(key, field)
        } else {
            CriterionSpec::text(key, field)
        }
    });
    Schema::new(specs)
}

/// Display label for a survey field, if it is one.
pub fn survey_label(field: &str) -> Option<&'static str> {
    SURVEY
        .iter()
        .find(|(_, f, _, _)| *f == field)
        .map(|(_, _, label, _)| *label)
}

/// Loads a schema from a YAML file.
pub fn load(path: &Path) -> Result<Schema, SchemaFileError> {
    let yaml = fs::read_to_string(path).map_err(|source| SchemaFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let schema: Schema = serde_yaml::from_str(&yaml).map_err(|source| SchemaFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), criteria = schema.len(), "loaded schema");
    Ok(schema)
}

/// Rewrites every text criterion to use `matching`.
pub fn with_text_match(schema: &Schema, matching: TextMatch) -> Result<Schema, SchemaFileError> {
    let specs = schema.iter().cloned().map(|mut spec| {
        if spec.kind.is_text() {
            spec.kind = CriterionKind::Text { matching };
        }
        spec
    });
    Ok(Schema::new(specs)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn survey_keys_in_order() {
        let schema = survey().unwrap();
        assert_eq!(
            schema.keys().collect::<Vec<_>>(),
            [
                "region",
                "industry",
                "businessActivitySales",
                "establishmentSales",
                "totalEmployees",
                "dispatchers",
                "recipients",
                "workers"
            ]
        );
        assert!(schema.get("region").unwrap().kind.is_text());
        assert!(schema.get("workers").unwrap().kind.is_numeric());
    }

    #[test]
    fn labels() {
        assert_eq!(
            survey_label("EstablishmentCompany_Workers_People"),
            Some("Workers (People)")
        );
        assert_eq!(survey_label("Region"), Some("Region"));
        assert_eq!(survey_label("Other"), None);
    }

    #[test]
    fn load_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "- key: region\n  field: Region\n  kind: text\n  match: exact\n- key: minSales\n  field: Sales\n  kind: min"
        )
        .unwrap();

        let schema = load(file.path()).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(
            schema.get("region").unwrap().kind,
            CriterionKind::Text {
                matching: TextMatch::Exact
            }
        );
        assert_eq!(schema.get("minSales").unwrap().field, "Sales");
    }

    #[test]
    fn duplicate_keys_in_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "- {{key: region, field: Region, kind: text}}\n- {{key: region, field: Area, kind: text}}"
        )
        .unwrap();

        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, SchemaFileError::Parse { .. }));
        assert!(err.to_string().contains("duplicate criterion key 'region'"));
    }

    #[test]
    fn survey_keeps_every_criterion() {
        let schema = survey().unwrap();
        assert_eq!(schema.len(), SURVEY.len());
        for (key, field, _, numeric) in SURVEY {
            let spec = schema.get(key).unwrap();
            assert_eq!(spec.field, field);
            assert_eq!(spec.kind.is_numeric(), numeric);
        }
    }

    #[test]
    fn missing_file() {
        let err = load(Path::new("/nonexistent/schema.yaml")).unwrap_err();
        assert!(matches!(err, SchemaFileError::Read { .. }));
    }

    #[test]
    fn exact_matching_applies_to_text_only() {
        let schema = with_text_match(&survey().unwrap(), TextMatch::Exact).unwrap();
        assert_eq!(
            schema.get("industry").unwrap().kind,
            CriterionKind::Text {
                matching: TextMatch::Exact
            }
        );
        assert_eq!(schema.get("workers").unwrap().kind, CriterionKind::Min);
    }
}
