//! Collector configuration loaded from an optional TOML file.
//!
//! Every field has a default matching the public registry endpoints, so the
//! file only needs to name what differs. Command-line flags are applied on
//! top with [`CollectorConfig::apply_overrides`].

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;

use crate::cli::Cli;
use crate::registry::package::PackageId;
use crate::registry::retry::RetryPolicy;

/// Base URL of the CNR registry API.
pub const DEFAULT_REGISTRY_URL: &str = "https://quay.io/cnr/api/v1";

/// Upstream community operators package index for the Instana agent.
pub const DEFAULT_INDEX_URL: &str = concat!(
    "https://raw.githubusercontent.com/operator-framework/community-operators/",
    "master/upstream-community-operators/instana-agent/instana-agent.package.yaml",
);

/// Errors arising from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`CollectorConfig`].
    #[error("invalid configuration {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Registry endpoints, package identity, and network policy.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorConfig {
    /// Base URL of the bundle registry API.
    pub registry_url: String,
    /// URL of the upstream package index used by the `olm` source.
    pub index_url: String,
    /// Package whose bundles are collected.
    pub package: PackageId,
    /// Whether each blob must hash to its digest.
    pub verify_digests: bool,
    /// Timeout and retry settings.
    pub network: NetworkConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_owned(),
            index_url: DEFAULT_INDEX_URL.to_owned(),
            package: PackageId::default(),
            verify_digests: true,
            network: NetworkConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// Load configuration from `path`, or return the defaults when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid configuration.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Apply command-line overrides on top of file or default values.
    #[must_use]
    pub fn apply_overrides(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.registry_url {
            self.registry_url.clone_from(url);
        }
        if let Some(url) = &cli.index_url {
            self.index_url.clone_from(url);
        }
        if let Some(package) = &cli.package {
            self.package = package.clone();
        }
        if let Some(secs) = cli.timeout {
            self.network.timeout_secs = secs;
        }
        if let Some(retries) = cli.retries {
            self.network.max_attempts = retries.saturating_add(1);
        }
        if cli.skip_verify {
            self.verify_digests = false;
        }
        self
    }
}

/// Per-request timeout and retry schedule.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Global timeout for one request, in seconds.
    pub timeout_secs: u64,
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Upper bound on any retry delay, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8000,
        }
    }
}

impl NetworkConfig {
    /// The request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The retry schedule described by these settings.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
    }
}
