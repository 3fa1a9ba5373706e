//! In-memory opening of bundle blobs.
//!
//! Registry blobs are tape archives, gzip-compressed for every bundle the
//! registry serves today but plain for some older uploads. Each blob is read
//! fully into memory; only regular file entries are kept.
//!
//! bzip2 and xz compression are not supported. Such blobs fail to open as
//! [`ArchiveError::Io`], which aborts the run and names the blob.

use flate2::read::GzDecoder;
use std::io::Read;

/// Leading bytes of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Errors arising from opening a bundle archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The bytes are not a readable (optionally gzip-compressed) tar archive.
    #[error("unreadable bundle archive: {0}")]
    Io(#[from] std::io::Error),

    /// The archive holds no regular files.
    #[error("bundle archive contains no files")]
    Empty,
}

/// One regular file read from a bundle archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    path: String,
    contents: Vec<u8>,
}

impl ArchiveEntry {
    /// Build an entry from its archive path and contents.
    #[must_use]
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Path of the entry inside the archive.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw file contents.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

/// The regular files of one bundle, in archive order.
///
/// # Examples
///
/// ```
/// use csv_collector::bundle::archive::{ArchiveEntry, BundleArchive};
///
/// let archive = BundleArchive::from_entries(vec![ArchiveEntry::new("a/bundle.yaml", "data: {}")]);
/// assert_eq!(archive.entries().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleArchive {
    entries: Vec<ArchiveEntry>,
}

impl BundleArchive {
    /// Open blob bytes as a tar archive, decompressing gzip when present.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the bytes are not a tar archive and
    /// [`ArchiveError::Empty`] if it holds no regular files.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let entries = if bytes.starts_with(&GZIP_MAGIC) {
            read_entries(GzDecoder::new(bytes))?
        } else {
            read_entries(bytes)?
        };
        if entries.is_empty() {
            return Err(ArchiveError::Empty);
        }
        Ok(Self { entries })
    }

    /// Wrap already-read entries.
    #[must_use]
    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }

    /// All regular file entries, in archive order.
    #[must_use]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }
}

fn read_entries<R: Read>(reader: R) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = tar::Archive::new(reader);
    let mut entries = Vec::new();

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry.path()?.to_string_lossy().into_owned();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        entries.push(ArchiveEntry { path, contents });
    }

    Ok(entries)
}
