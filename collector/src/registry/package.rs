//! Registry package identity (`<namespace>/<name>`).

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_NAMESPACE: &str = "certified-operators";
const DEFAULT_NAME: &str = "instana-agent";

/// Error raised when a package identity cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid package \"{value}\"; expected <namespace>/<name>")]
pub struct PackageIdError {
    /// The rejected package text.
    pub value: String,
}

/// A validated registry package identity.
///
/// # Examples
///
/// ```
/// use csv_collector::registry::package::PackageId;
///
/// let package: PackageId = "certified-operators/instana-agent".parse().expect("valid");
/// assert_eq!(package.namespace(), "certified-operators");
/// assert_eq!(package.name(), "instana-agent");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct PackageId {
    namespace: String,
    name: String,
}

impl PackageId {
    /// The namespace segment (for example `certified-operators`).
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The package name segment (for example `instana-agent`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Defaults to the package collected when no override is configured.
impl Default for PackageId {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            name: DEFAULT_NAME.to_owned(),
        }
    }
}

impl FromStr for PackageId {
    type Err = PackageIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let reject = || PackageIdError {
            value: value.to_owned(),
        };
        let (namespace, name) = value.split_once('/').ok_or_else(reject)?;
        let is_segment = |segment: &str| !segment.is_empty() && !segment.contains('/');
        if !is_segment(namespace) || !is_segment(name) {
            return Err(reject());
        }
        Ok(Self {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
        })
    }
}

impl TryFrom<String> for PackageId {
    type Error = PackageIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
