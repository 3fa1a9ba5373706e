//! Persist a version chain as one YAML file per CSV.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

use super::chain::VersionChain;

/// File extension of written CSVs.
const CSV_EXTENSION: &str = "yaml";

/// Errors arising from writing CSV files.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV file could not be written.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// The file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV could not be serialized.
    #[error("failed to serialize CSV {name}: {source}")]
    Serialize {
        /// Name of the CSV.
        name: String,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// A CSV name would place its file outside the output directory.
    #[error("CSV name {name:?} is not a valid file name")]
    UnsafeName {
        /// The offending name.
        name: String,
    },
}

/// Write every record of `chain` to `<outdir>/<name>.yaml`.
///
/// The directory is created if missing and existing files are overwritten.
/// Returns the written paths in chain order.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, a name is not a
/// plain file name, or serialization or writing fails.
pub fn write_chain(chain: &VersionChain, outdir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, WriteError> {
    std::fs::create_dir_all(outdir).map_err(|source| WriteError::CreateDir {
        path: outdir.to_owned(),
        source,
    })?;

    let mut written = Vec::with_capacity(chain.len());
    for record in chain.iter() {
        let path = csv_path(outdir, record.name())?;
        let yaml = record.to_yaml().map_err(|source| WriteError::Serialize {
            name: record.name().to_owned(),
            source,
        })?;
        std::fs::write(&path, yaml).map_err(|source| WriteError::WriteFile {
            path: path.clone(),
            source,
        })?;
        debug!("wrote {path}");
        written.push(path);
    }
    Ok(written)
}

/// Output path for the CSV called `name`.
fn csv_path(outdir: &Utf8Path, name: &str) -> Result<Utf8PathBuf, WriteError> {
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);
    if !is_plain {
        return Err(WriteError::UnsafeName {
            name: name.to_owned(),
        });
    }
    Ok(outdir.join(format!("{name}.{CSV_EXTENSION}")))
}
