//! Registry access for package indexes, bundle listings, and blobs.
//!
//! Provides a trait-based abstraction over the two registry APIs the
//! collector talks to, so the pipeline can be exercised without network
//! access. The production implementation uses a blocking `ureq` agent with
//! a global timeout and the configured [`RetryPolicy`].

use log::debug;
use std::time::Duration;

use super::digest::Digest;
use super::package::PackageId;
use super::retry::RetryPolicy;
use crate::config::CollectorConfig;

/// Upper bound on a single blob body; bundle archives are a few KiB.
const MAX_BLOB_BYTES: u64 = 64 * 1024 * 1024;

/// Trait for fetching registry documents.
///
/// # Examples
///
/// ```
/// use csv_collector::config::CollectorConfig;
/// use csv_collector::registry::download::HttpRegistryClient;
///
/// let client = HttpRegistryClient::new(&CollectorConfig::default());
/// // Use client.fetch_bundle_listing(&package) in production
/// # let _ = client;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait RegistryClient {
    /// Download the upstream package index YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the index is not found.
    fn fetch_package_index(&self) -> Result<String, DownloadError>;

    /// Download the JSON listing of bundles published for `package`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the package is not found.
    fn fetch_bundle_listing(&self, package: &PackageId) -> Result<String, DownloadError>;

    /// Download the archive bytes stored under `digest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the blob is not found.
    fn fetch_blob(&self, package: &PackageId, digest: &Digest) -> Result<Vec<u8>, DownloadError>;
}

/// Errors arising from registry requests.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The request could not be completed (connection, TLS, timeout, body).
    #[error("request failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The registry answered with a non-success status other than 404.
    #[error("registry returned HTTP {code} for {url}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        code: u16,
    },

    /// The requested document was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The response body was larger than the client accepts.
    #[error("response from {url} exceeds the {limit} byte limit")]
    TooLarge {
        /// The URL that was requested.
        url: String,
        /// The body size limit in bytes.
        limit: u64,
    },
}

impl DownloadError {
    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures, rate limiting (429), and server errors (5xx) are
    /// transient; everything else is reported immediately.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpError { .. } => true,
            Self::Status { code, .. } => *code == 429 || *code >= 500,
            Self::NotFound { .. } | Self::TooLarge { .. } => false,
        }
    }
}

/// HTTP-based registry client using `ureq`.
pub struct HttpRegistryClient {
    agent: ureq::Agent,
    registry_url: String,
    index_url: String,
    retry: RetryPolicy,
    sleep: fn(Duration),
}

impl HttpRegistryClient {
    /// Build a client from the collector configuration.
    #[must_use]
    pub fn new(config: &CollectorConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.network.timeout()))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            registry_url: config.registry_url.trim_end_matches('/').to_owned(),
            index_url: config.index_url.clone(),
            retry: config.network.retry_policy(),
            sleep: std::thread::sleep,
        }
    }

    /// URL of the bundle listing for `package`.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_collector::config::CollectorConfig;
    /// use csv_collector::registry::download::HttpRegistryClient;
    /// use csv_collector::registry::package::PackageId;
    ///
    /// let client = HttpRegistryClient::new(&CollectorConfig::default());
    /// let url = client.listing_url(&PackageId::default());
    /// assert!(url.ends_with("/packages/certified-operators/instana-agent/"));
    /// ```
    #[must_use]
    pub fn listing_url(&self, package: &PackageId) -> String {
        format!(
            "{}/packages/{}/{}/",
            self.registry_url,
            package.namespace(),
            package.name()
        )
    }

    /// URL of the blob stored under `digest` for `package`.
    #[must_use]
    pub fn blob_url(&self, package: &PackageId, digest: &Digest) -> String {
        format!(
            "{}/packages/{}/{}/blobs/sha256/{digest}",
            self.registry_url,
            package.namespace(),
            package.name()
        )
    }

    fn get_text(&self, url: &str) -> Result<String, DownloadError> {
        self.retry.run(&self.sleep, || {
            debug!("GET {url}");
            let response = self
                .agent
                .get(url)
                .call()
                .map_err(|e| map_ureq_error(url, &e))?;
            response
                .into_body()
                .read_to_string()
                .map_err(|e| map_ureq_error(url, &e))
        })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.retry.run(&self.sleep, || {
            debug!("GET {url}");
            let response = self
                .agent
                .get(url)
                .call()
                .map_err(|e| map_ureq_error(url, &e))?;
            response
                .into_body()
                .with_config()
                .limit(MAX_BLOB_BYTES)
                .read_to_vec()
                .map_err(|e| map_ureq_error(url, &e))
        })
    }
}

impl RegistryClient for HttpRegistryClient {
    fn fetch_package_index(&self) -> Result<String, DownloadError> {
        self.get_text(&self.index_url)
    }

    fn fetch_bundle_listing(&self, package: &PackageId) -> Result<String, DownloadError> {
        self.get_text(&self.listing_url(package))
    }

    fn fetch_blob(&self, package: &PackageId, digest: &Digest) -> Result<Vec<u8>, DownloadError> {
        self.get_bytes(&self.blob_url(package, digest))
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::StatusCode(code) => DownloadError::Status {
            url: url.to_owned(),
            code: *code,
        },
        ureq::Error::BodyExceedsLimit(limit) => DownloadError::TooLarge {
            url: url.to_owned(),
            limit: *limit,
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
