//! ClusterServiceVersion records, collection, chaining, and persistence.
//!
//! - [`record`] - A single CSV document (`CsvRecord`).
//! - [`collection`] - Version-keyed accumulator with last-write-wins policy.
//! - [`chain`] - Semver ordering, alpha filtering, and `replaces` linking.
//! - [`writer`] - One YAML file per chained CSV.

pub mod chain;
pub mod collection;
pub mod record;
pub mod writer;
