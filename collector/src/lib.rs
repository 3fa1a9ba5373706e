//! Operator CSV collector library.
//!
//! This crate fetches historical operator bundles from a CNR registry,
//! extracts their ClusterServiceVersions, links the non-alpha releases into
//! an upgrade chain through `spec.replaces`, and writes one YAML file per
//! release. It backs the `collect-csvs` binary and can be driven directly
//! against any [`registry::download::RegistryClient`].
//!
//! # Modules
//!
//! - [`bundle`] - Archive opening, digest verification, and CSV extraction
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Registry endpoints, package identity, and network policy
//! - [`csv`] - CSV records, version-keyed collection, chaining, and writing
//! - [`error`] - Crate-wide error type and exit codes
//! - [`output`] - Standard error helpers and summary messages
//! - [`pipeline`] - End-to-end run orchestration
//! - [`registry`] - Registry client, retry policy, and response parsing
//! - [`source`] - Version source selection

pub mod bundle;
pub mod cli;
pub mod config;
pub mod csv;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
