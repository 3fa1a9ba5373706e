//! Registry access: package identity, digests, HTTP client, and the
//! documents the registry serves.
//!
//! # Sub-modules
//!
//! - [`digest`] - Content digest newtype (`Digest`).
//! - [`download`] - `RegistryClient` trait and the `ureq` implementation.
//! - [`listing`] - Bundle listing JSON deserialization.
//! - [`package`] - Package identity newtype (`PackageId`).
//! - [`package_index`] - Upstream package index YAML parsing.
//! - [`retry`] - Bounded retry with exponential backoff.

pub mod digest;
pub mod download;
pub mod listing;
pub mod package;
pub mod package_index;
pub mod retry;
