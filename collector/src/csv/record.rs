//! A single ClusterServiceVersion document.
//!
//! The record keeps the whole YAML mapping so that serialization writes back
//! every field, in its original order. Only the handful of fields the chain
//! needs are read, and only `spec.replaces` is ever written.

use serde_yaml_ng::{Mapping, Value};

/// Maturity value that excludes a CSV from the upgrade chain.
pub const ALPHA_MATURITY: &str = "alpha";

/// Errors arising from turning a YAML mapping into a [`CsvRecord`].
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A field needed to key or link the record is absent or not a string.
    #[error("CSV is missing string field `{field}`")]
    MissingField {
        /// Dotted path of the missing field.
        field: &'static str,
    },

    /// The YAML text could not be parsed.
    #[error("CSV parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The YAML text parsed to something other than a mapping.
    #[error("CSV document is not a mapping")]
    NotAMapping,
}

/// One operator release's CSV.
///
/// # Examples
///
/// ```
/// use csv_collector::csv::record::CsvRecord;
///
/// let record = CsvRecord::from_yaml(concat!(
///     "metadata:\n  name: instana-agent.v1.0.0\n",
///     "spec:\n  version: 1.0.0\n  maturity: stable\n",
/// ))
/// .expect("valid CSV");
/// assert_eq!(record.name(), "instana-agent.v1.0.0");
/// assert_eq!(record.version(), "1.0.0");
/// assert!(!record.is_alpha());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRecord {
    document: Mapping,
    name: String,
    version: String,
}

impl CsvRecord {
    /// Parse a single YAML document into a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, is not a mapping, or lacks
    /// `metadata.name` or `spec.version`.
    pub fn from_yaml(text: &str) -> Result<Self, RecordError> {
        let value: Value = serde_yaml_ng::from_str(text)?;
        match value {
            Value::Mapping(document) => Self::try_from(document),
            _ => Err(RecordError::NotAMapping),
        }
    }

    /// Unique identifier (`metadata.name`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic version string (`spec.version`).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Release maturity (`spec.maturity`), when present.
    #[must_use]
    pub fn maturity(&self) -> Option<&str> {
        string_at(&self.document, "spec", "maturity")
    }

    /// Whether this release is an alpha and so stays out of the chain.
    #[must_use]
    pub fn is_alpha(&self) -> bool {
        self.maturity() == Some(ALPHA_MATURITY)
    }

    /// Predecessor identifier (`spec.replaces`), when present.
    #[must_use]
    pub fn replaces(&self) -> Option<&str> {
        string_at(&self.document, "spec", "replaces")
    }

    /// Point `spec.replaces` at `predecessor`.
    ///
    /// An existing key is updated in place; otherwise the key is appended
    /// after the other `spec` fields.
    pub fn set_replaces(&mut self, predecessor: &str) {
        if let Some(spec) = self.spec_mut() {
            spec.insert(
                Value::String("replaces".to_owned()),
                Value::String(predecessor.to_owned()),
            );
        }
    }

    /// Remove `spec.replaces`, leaving the other `spec` fields in order.
    pub fn clear_replaces(&mut self) {
        if let Some(spec) = self.spec_mut() {
            spec.remove("replaces");
        }
    }

    fn spec_mut(&mut self) -> Option<&mut Mapping> {
        self.document
            .get_mut("spec")
            .and_then(Value::as_mapping_mut)
    }

    /// The full document.
    #[must_use]
    pub fn document(&self) -> &Mapping {
        &self.document
    }

    /// Serialize the document as block-style YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(&self.document)
    }
}

impl TryFrom<Mapping> for CsvRecord {
    type Error = RecordError;

    fn try_from(document: Mapping) -> Result<Self, Self::Error> {
        let name = string_at(&document, "metadata", "name")
            .ok_or(RecordError::MissingField {
                field: "metadata.name",
            })?
            .to_owned();
        let version = string_at(&document, "spec", "version")
            .ok_or(RecordError::MissingField {
                field: "spec.version",
            })?
            .to_owned();
        Ok(Self {
            document,
            name,
            version,
        })
    }
}

fn string_at<'a>(document: &'a Mapping, section: &str, field: &str) -> Option<&'a str> {
    document.get(section)?.get(field)?.as_str()
}
