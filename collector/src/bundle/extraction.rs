//! Candidate CSV extraction from an opened bundle archive.
//!
//! Each [`BundleLayout`] case has its own extraction function. Candidates
//! that are not mappings are skipped; mappings must carry the fields a
//! [`CsvRecord`] needs.

use log::debug;
use serde::Deserialize as _;
use serde_yaml_ng::{Mapping, Value};

use super::archive::{ArchiveEntry, BundleArchive};
use super::layout::BundleLayout;
use crate::csv::record::{CsvRecord, RecordError};

/// Descriptor section holding the embedded CSV stream.
const DESCRIPTOR_DATA_KEY: &str = "data";

/// Descriptor field holding the multi-document CSV stream.
const DESCRIPTOR_CSVS_KEY: &str = "clusterServiceVersions";

/// Errors arising from extracting CSVs out of an archive.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// An entry (or a document embedded in it) is not valid YAML.
    #[error("malformed YAML in {path}: {source}")]
    Yaml {
        /// Archive path of the entry.
        path: String,
        /// The underlying parse error.
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// A bundle descriptor lacks the embedded CSV stream.
    #[error("bundle descriptor {path} has no `data.clusterServiceVersions` string")]
    MissingDescriptorField {
        /// Archive path of the descriptor.
        path: String,
    },

    /// A mapping candidate cannot be keyed or linked.
    #[error("invalid CSV in {path}: {source}")]
    Record {
        /// Archive path of the entry the candidate came from.
        path: String,
        /// Why the candidate was rejected.
        #[source]
        source: RecordError,
    },
}

/// Extract every CSV record from `archive`, in archive order.
///
/// # Errors
///
/// Returns an error if an entry holds malformed YAML, a descriptor lacks its
/// CSV stream, or a mapping candidate lacks `metadata.name` or
/// `spec.version`.
///
/// # Examples
///
/// ```
/// use csv_collector::bundle::archive::{ArchiveEntry, BundleArchive};
/// use csv_collector::bundle::extraction::extract_records;
///
/// let archive = BundleArchive::from_entries(vec![ArchiveEntry::new(
///     "op/op.v1.0.0.clusterserviceversion.yaml",
///     "metadata: {name: op.v1.0.0}\nspec: {version: 1.0.0}\n",
/// )]);
/// let records = extract_records(&archive).expect("extracted");
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].name(), "op.v1.0.0");
/// ```
pub fn extract_records(archive: &BundleArchive) -> Result<Vec<CsvRecord>, ExtractionError> {
    match BundleLayout::detect(archive) {
        BundleLayout::Descriptor(entry) => from_descriptor(entry),
        BundleLayout::Manifests(entries) => from_manifests(&entries),
    }
}

fn from_descriptor(entry: &ArchiveEntry) -> Result<Vec<CsvRecord>, ExtractionError> {
    debug!("reading CSVs from bundle descriptor {}", entry.path());
    let descriptor = parse_entry(entry)?;
    let stream = descriptor
        .get(DESCRIPTOR_DATA_KEY)
        .and_then(|data| data.get(DESCRIPTOR_CSVS_KEY))
        .and_then(Value::as_str)
        .ok_or_else(|| ExtractionError::MissingDescriptorField {
            path: entry.path().to_owned(),
        })?;

    let mut records = Vec::new();
    for document in serde_yaml_ng::Deserializer::from_str(stream) {
        let value = Value::deserialize(document).map_err(|source| yaml_error(entry, source))?;
        records.extend(records_from(entry, value)?);
    }
    Ok(records)
}

fn from_manifests(entries: &[&ArchiveEntry]) -> Result<Vec<CsvRecord>, ExtractionError> {
    if entries.is_empty() {
        debug!("archive has neither a bundle descriptor nor CSV manifests");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for entry in entries {
        debug!("reading CSV manifest {}", entry.path());
        let value = parse_entry(entry)?;
        records.extend(records_from(entry, value)?);
    }
    Ok(records)
}

/// Parse one entry as a single YAML document; blank files are null.
fn parse_entry(entry: &ArchiveEntry) -> Result<Value, ExtractionError> {
    if entry.contents().iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_yaml_ng::from_slice(entry.contents()).map_err(|source| yaml_error(entry, source))
}

fn records_from(entry: &ArchiveEntry, value: Value) -> Result<Vec<CsvRecord>, ExtractionError> {
    candidates(value)
        .into_iter()
        .map(|candidate| {
            CsvRecord::try_from(candidate).map_err(|source| ExtractionError::Record {
                path: entry.path().to_owned(),
                source,
            })
        })
        .collect()
}

/// Mappings carried by one document; a sequence contributes its mapping items.
fn candidates(value: Value) -> Vec<Mapping> {
    match value {
        Value::Mapping(mapping) => vec![mapping],
        Value::Sequence(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Mapping(mapping) => Some(mapping),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn yaml_error(entry: &ArchiveEntry, source: serde_yaml_ng::Error) -> ExtractionError {
    ExtractionError::Yaml {
        path: entry.path().to_owned(),
        source,
    }
}
