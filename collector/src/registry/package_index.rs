//! Upstream package index parsing.
//!
//! The community operators repository publishes one `<package>.package.yaml`
//! per operator; its first channel names the current CSV.

use serde::Deserialize;

/// Errors arising from package index parsing.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// YAML deserialization failed.
    #[error("package index parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The index lists no channels.
    #[error("package index has no channels")]
    NoChannels,

    /// The first channel does not name a current CSV.
    #[error("first channel of the package index has no currentCSV")]
    MissingCurrentCsv,
}

#[derive(Debug, Deserialize)]
struct PackageIndex {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "currentCSV")]
    current_csv: Option<String>,
}

/// Return the `currentCSV` of the index's first channel.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, lists no channels, or the
/// first channel has no `currentCSV`.
///
/// # Examples
///
/// ```
/// use csv_collector::registry::package_index::current_csv;
///
/// let yaml = "channels:\n- name: beta\n  currentCSV: instana-agent.v1.2.3\n";
/// assert_eq!(current_csv(yaml).expect("valid index"), "instana-agent.v1.2.3");
/// ```
pub fn current_csv(yaml: &str) -> Result<String, IndexError> {
    let index: PackageIndex = serde_yaml_ng::from_str(yaml)?;
    let channel = index.channels.into_iter().next().ok_or(IndexError::NoChannels)?;
    channel.current_csv.ok_or(IndexError::MissingCurrentCsv)
}
