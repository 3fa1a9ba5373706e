//! Version source selection.

use std::fmt;
use std::str::FromStr;

use crate::error::CollectorError;

/// Where the collector reads operator versions from.
///
/// # Examples
///
/// ```
/// use csv_collector::source::Source;
///
/// assert_eq!("olm".parse::<Source>().expect("known source"), Source::Olm);
/// assert!("bogus".parse::<Source>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Source {
    /// Certified registry bundles: collect, chain, and write every CSV.
    #[default]
    Redhat,
    /// Upstream community package index: print its current CSV only.
    Olm,
}

impl FromStr for Source {
    type Err = CollectorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "redhat" => Ok(Self::Redhat),
            "olm" => Ok(Self::Olm),
            other => Err(CollectorError::UnrecognizedSource {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redhat => write!(f, "redhat"),
            Self::Olm => write!(f, "olm"),
        }
    }
}
