//! Error types for the CSV collector.
//!
//! Each layer owns its error enum; [`CollectorError`] wraps them so the
//! binary reports a single diagnostic line and exit code.

use thiserror::Error;

use crate::bundle::archive::ArchiveError;
use crate::bundle::extraction::ExtractionError;
use crate::bundle::verification::DigestMismatch;
use crate::config::ConfigError;
use crate::csv::chain::ChainError;
use crate::csv::writer::WriteError;
use crate::registry::digest::Digest;
use crate::registry::download::DownloadError;
use crate::registry::listing::ListingError;
use crate::registry::package_index::IndexError;

/// Errors that abort a collection run.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// `--source` named neither `redhat` nor `olm`.
    #[error("unrecognized source \"{value}\"; expected one of: redhat, olm")]
    UnrecognizedSource {
        /// The rejected value.
        value: String,
    },

    /// The configuration file could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A registry request failed.
    #[error("{0}")]
    Download(#[from] DownloadError),

    /// The bundle listing was malformed.
    #[error("{0}")]
    Listing(#[from] ListingError),

    /// The upstream package index was malformed or incomplete.
    #[error("{0}")]
    Index(#[from] IndexError),

    /// A blob did not match the digest it was listed under.
    #[error("{0}")]
    DigestMismatch(#[from] DigestMismatch),

    /// A blob could not be opened as an archive.
    #[error("bundle {digest}: {source}")]
    Archive {
        /// Digest of the offending blob.
        digest: Digest,
        /// The underlying archive error.
        #[source]
        source: ArchiveError,
    },

    /// CSVs could not be extracted from an archive.
    #[error("bundle {digest}: {source}")]
    Extraction {
        /// Digest of the offending blob.
        digest: Digest,
        /// The underlying extraction error.
        #[source]
        source: ExtractionError,
    },

    /// The upgrade chain could not be built.
    #[error("{0}")]
    Chain(#[from] ChainError),

    /// The chain could not be written to disk.
    #[error("{0}")]
    Write(#[from] WriteError),

    /// Failed to write the result to standard output.
    #[error("failed to write output: {source}")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl CollectorError {
    /// Process exit code for this error.
    ///
    /// Every failure currently maps to `1`; clap usage errors never reach
    /// this type and keep clap's own code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

/// Result type alias using [`CollectorError`].
pub type Result<T> = std::result::Result<T, CollectorError>;
