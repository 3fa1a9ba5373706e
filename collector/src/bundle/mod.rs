//! Bundle blob handling.
//!
//! - [`archive`] - Open tar (optionally gzip) blobs in memory.
//! - [`verification`] - Check blob bytes against their listed digest.
//! - [`layout`] - Detect where an archive keeps its CSVs.
//! - [`extraction`] - Turn an archive's CSV documents into records.

pub mod archive;
pub mod extraction;
pub mod layout;
pub mod verification;
