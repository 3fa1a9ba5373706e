//! Bundle listing deserialization.
//!
//! The registry answers `GET packages/<namespace>/<name>/` with a JSON array
//! of release descriptors. Only `content.digest` matters here; every other
//! field is ignored.

use serde::Deserialize;

use super::digest::{Digest, DigestError};

/// Errors arising from bundle listing parsing.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// JSON deserialization failed.
    #[error("bundle listing parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A descriptor carried a malformed digest.
    #[error(transparent)]
    Digest(#[from] DigestError),
}

#[derive(Debug, Deserialize)]
struct BundleDescriptor {
    content: BundleContent,
}

#[derive(Debug, Deserialize)]
struct BundleContent {
    digest: String,
}

/// Parse a bundle listing into digests, preserving listing order.
///
/// # Errors
///
/// Returns an error if the body is not a JSON array of descriptors with a
/// `content.digest` string, or if any digest is malformed.
///
/// # Examples
///
/// ```
/// use csv_collector::registry::listing::parse_listing;
///
/// let digest = "a".repeat(64);
/// let json = format!(r#"[{{"release":"1.0.0","content":{{"digest":"{digest}"}}}}]"#);
/// let digests = parse_listing(&json).expect("valid listing");
/// assert_eq!(digests[0].as_str(), digest);
/// ```
pub fn parse_listing(json: &str) -> Result<Vec<Digest>, ListingError> {
    let descriptors: Vec<BundleDescriptor> = serde_json::from_str(json)?;
    descriptors
        .into_iter()
        .map(|descriptor| Digest::try_from(descriptor.content.digest).map_err(ListingError::from))
        .collect()
}
