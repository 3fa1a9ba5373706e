//! Version-keyed accumulator for extracted CSVs.

use log::debug;
use std::collections::BTreeMap;

use super::record::CsvRecord;

/// At most one CSV per distinct `spec.version` string.
///
/// Overwrite policy: inserting a record whose version is already present
/// replaces the stored record wholesale (no field merge), so the archive
/// processed last wins. Iteration is ordered by version string, which keeps
/// later sorting deterministic; semantic ordering is the chain builder's job.
///
/// # Examples
///
/// ```
/// use csv_collector::csv::collection::CsvCollection;
/// use csv_collector::csv::record::CsvRecord;
///
/// let first = CsvRecord::from_yaml("metadata: {name: a}\nspec: {version: 1.0.0}\n").expect("CSV");
/// let second = CsvRecord::from_yaml("metadata: {name: b}\nspec: {version: 1.0.0}\n").expect("CSV");
///
/// let mut collection = CsvCollection::default();
/// assert!(collection.insert(first).is_none());
/// assert!(collection.insert(second).is_some());
/// assert_eq!(collection.get("1.0.0").map(CsvRecord::name), Some("b"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvCollection {
    by_version: BTreeMap<String, CsvRecord>,
}

impl CsvCollection {
    /// Store `record` under its version, returning any record it replaced.
    pub fn insert(&mut self, record: CsvRecord) -> Option<CsvRecord> {
        let replaced = self.by_version.insert(record.version().to_owned(), record);
        if let Some(previous) = &replaced {
            debug!(
                "version {} seen again; replacing {}",
                previous.version(),
                previous.name()
            );
        }
        replaced
    }

    /// The record stored for `version`.
    #[must_use]
    pub fn get(&self, version: &str) -> Option<&CsvRecord> {
        self.by_version.get(version)
    }

    /// Number of distinct versions collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_version.len()
    }

    /// Whether nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_version.is_empty()
    }

    /// Consume the collection, yielding records ordered by version string.
    pub fn into_records(self) -> impl Iterator<Item = CsvRecord> {
        self.by_version.into_values()
    }
}

impl Extend<CsvRecord> for CsvCollection {
    fn extend<I: IntoIterator<Item = CsvRecord>>(&mut self, records: I) {
        for record in records {
            self.insert(record);
        }
    }
}

impl FromIterator<CsvRecord> for CsvCollection {
    fn from_iter<I: IntoIterator<Item = CsvRecord>>(records: I) -> Self {
        let mut collection = Self::default();
        collection.extend(records);
        collection
    }
}
