//! Bundle archive layout detection.
//!
//! Registry bundles come in two shapes. Newer ones carry a single
//! `bundle.yaml` descriptor that embeds every CSV as a multi-document string;
//! older ones ship each CSV as its own `*.clusterserviceversion.yaml` file.
//! The layout is detected once per archive.

use super::archive::{ArchiveEntry, BundleArchive};

/// Path marker of a bundle descriptor entry.
pub const DESCRIPTOR_MARKER: &str = "bundle.yaml";

/// Path marker of a standalone CSV entry.
pub const MANIFEST_MARKER: &str = "clusterserviceversion.yaml";

/// Where the CSVs of one archive live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleLayout<'a> {
    /// The first descriptor entry; authoritative for the whole archive.
    Descriptor(&'a ArchiveEntry),
    /// Every standalone CSV entry, in archive order (possibly none).
    Manifests(Vec<&'a ArchiveEntry>),
}

impl<'a> BundleLayout<'a> {
    /// Detect the layout of `archive`.
    ///
    /// A descriptor wins over standalone CSVs whenever one is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_collector::bundle::archive::{ArchiveEntry, BundleArchive};
    /// use csv_collector::bundle::layout::BundleLayout;
    ///
    /// let archive = BundleArchive::from_entries(vec![
    ///     ArchiveEntry::new("op/op.v1.clusterserviceversion.yaml", ""),
    ///     ArchiveEntry::new("op/bundle.yaml", ""),
    /// ]);
    /// assert!(matches!(BundleLayout::detect(&archive), BundleLayout::Descriptor(_)));
    /// ```
    #[must_use]
    pub fn detect(archive: &'a BundleArchive) -> Self {
        let entries = archive.entries();
        if let Some(descriptor) = entries
            .iter()
            .find(|entry| entry.path().contains(DESCRIPTOR_MARKER))
        {
            return Self::Descriptor(descriptor);
        }
        Self::Manifests(
            entries
                .iter()
                .filter(|entry| entry.path().contains(MANIFEST_MARKER))
                .collect(),
        )
    }
}
