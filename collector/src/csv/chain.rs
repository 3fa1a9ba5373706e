//! Upgrade chain construction.
//!
//! Records are ordered by semantic version precedence, alpha releases are
//! dropped, and every surviving record after the first is pointed at its
//! predecessor through `spec.replaces`. The first surviving record has no
//! predecessor, so any `replaces` it was published with is removed. Alpha
//! records are removed before linking, so they never become a `replaces`
//! target.

use log::info;
use semver::Version;

use super::collection::CsvCollection;
use super::record::CsvRecord;

/// Errors arising from chain construction.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// A CSV version is not valid semantic versioning syntax.
    #[error("CSV {name} has invalid version \"{version}\": {source}")]
    InvalidVersion {
        /// Name of the offending CSV.
        name: String,
        /// The rejected version string.
        version: String,
        /// The underlying semver error.
        #[source]
        source: semver::Error,
    },

    /// Every collected CSV was filtered out (or none were collected).
    #[error("no eligible versions found: {collected} CSV(s) collected, all excluded")]
    NoEligibleVersions {
        /// How many CSVs were collected before filtering.
        collected: usize,
    },
}

/// Non-alpha CSVs in ascending version order, linked through `replaces`.
///
/// The chain always holds at least one record.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionChain {
    earlier: Vec<CsvRecord>,
    latest: CsvRecord,
}

impl VersionChain {
    /// The highest-version record.
    #[must_use]
    pub fn latest(&self) -> &CsvRecord {
        &self.latest
    }

    /// Number of records in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.earlier.len() + 1
    }

    /// A chain is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Records in ascending version order.
    pub fn iter(&self) -> impl Iterator<Item = &CsvRecord> {
        self.earlier.iter().chain(std::iter::once(&self.latest))
    }
}

/// Sort, filter, and link the collected records.
///
/// # Errors
///
/// Returns [`ChainError::InvalidVersion`] if any collected version (alpha
/// included) fails to parse, and [`ChainError::NoEligibleVersions`] if no
/// non-alpha record remains.
///
/// # Examples
///
/// ```
/// use csv_collector::csv::chain::build_chain;
/// use csv_collector::csv::collection::CsvCollection;
/// use csv_collector::csv::record::CsvRecord;
///
/// let csv = |name: &str, version: &str, maturity: &str| {
///     CsvRecord::from_yaml(&format!(
///         "metadata: {{name: {name}}}\nspec: {{version: {version}, maturity: {maturity}}}\n"
///     ))
///     .expect("CSV")
/// };
/// let collection: CsvCollection = [
///     csv("op.v1.2.0", "1.2.0", "stable"),
///     csv("op.v1.1.0", "1.1.0", "alpha"),
///     csv("op.v1.0.0", "1.0.0", "stable"),
/// ]
/// .into_iter()
/// .collect();
///
/// let chain = build_chain(collection).expect("non-empty chain");
/// assert_eq!(chain.latest().name(), "op.v1.2.0");
/// assert_eq!(chain.latest().replaces(), Some("op.v1.0.0"));
/// ```
pub fn build_chain(collection: CsvCollection) -> Result<VersionChain, ChainError> {
    let collected = collection.len();
    let mut versioned = collection
        .into_records()
        .map(|record| Ok((parse_version(&record)?, record)))
        .collect::<Result<Vec<_>, ChainError>>()?;
    versioned.sort_by(|(left, _), (right, _)| left.cmp(right));

    let mut linked: Vec<CsvRecord> = Vec::with_capacity(versioned.len());
    for (_, mut record) in versioned {
        if record.is_alpha() {
            continue;
        }
        match linked.last() {
            Some(previous) => record.set_replaces(previous.name()),
            None => record.clear_replaces(),
        }
        linked.push(record);
    }

    let latest = linked
        .pop()
        .ok_or(ChainError::NoEligibleVersions { collected })?;
    info!(
        "built chain of {} CSV(s) from {collected} collected; latest is {}",
        linked.len() + 1,
        latest.name()
    );
    Ok(VersionChain {
        earlier: linked,
        latest,
    })
}

fn parse_version(record: &CsvRecord) -> Result<Version, ChainError> {
    Version::parse(record.version()).map_err(|source| ChainError::InvalidVersion {
        name: record.name().to_owned(),
        version: record.version().to_owned(),
        source,
    })
}
