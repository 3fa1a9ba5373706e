//! End-to-end collection run.
//!
//! [`run`] resolves the CLI into settings and a live registry client, then
//! hands over to [`run_with`], which drives the stages against any
//! [`RegistryClient`]. The result identifier is the only thing written to
//! standard output.

use camino::Utf8PathBuf;
use log::{debug, info};
use std::io::Write;

use crate::bundle::archive::BundleArchive;
use crate::bundle::extraction::extract_records;
use crate::bundle::verification::VerificationPolicy;
use crate::cli::Cli;
use crate::config::CollectorConfig;
use crate::csv::chain::build_chain;
use crate::csv::collection::CsvCollection;
use crate::csv::writer::write_chain;
use crate::error::{CollectorError, Result};
use crate::output::{summary_message, write_stderr_line};
use crate::registry::download::{HttpRegistryClient, RegistryClient};
use crate::registry::listing::parse_listing;
use crate::registry::package::PackageId;
use crate::registry::package_index::current_csv;
use crate::source::Source;

/// Settings for one run, resolved from configuration and CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSettings {
    /// Registry package whose bundles are collected.
    pub package: PackageId,
    /// Where chained CSVs are written; `None` disables writing.
    pub outdir: Option<Utf8PathBuf>,
    /// Whether blobs must hash to their digests.
    pub verification: VerificationPolicy,
    /// Suppress the summary line on stderr.
    pub quiet: bool,
}

impl RunSettings {
    /// Combine loaded configuration with the run-specific CLI flags.
    #[must_use]
    pub fn new(config: &CollectorConfig, cli: &Cli) -> Self {
        Self {
            package: config.package.clone(),
            outdir: cli.output_dir(),
            verification: VerificationPolicy::new(config.verify_digests),
            quiet: cli.quiet,
        }
    }
}

/// Run the collector as the binary does.
///
/// The source is validated before configuration is read or any request is
/// made.
///
/// # Errors
///
/// Returns [`CollectorError::UnrecognizedSource`] for an unknown `--source`,
/// and any error from configuration loading or the run itself.
pub fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let source: Source = cli.source.parse()?;
    let config = CollectorConfig::load(cli.config.as_deref())?.apply_overrides(cli);
    let client = HttpRegistryClient::new(&config);
    let settings = RunSettings::new(&config, cli);

    let latest = run_with(source, &settings, &client, stderr)?;
    writeln!(stdout, "{latest}").map_err(|source| CollectorError::WriteFailed { source })
}

/// Run the selected source against `client` and return the identifier to
/// report.
///
/// # Errors
///
/// Returns the first download, parse, verification, chain, or write error;
/// no stage is retried here.
pub fn run_with(
    source: Source,
    settings: &RunSettings,
    client: &dyn RegistryClient,
    stderr: &mut dyn Write,
) -> Result<String> {
    match source {
        Source::Olm => upstream_current_csv(client),
        Source::Redhat => chain_registry_bundles(settings, client, stderr),
    }
}

fn upstream_current_csv(client: &dyn RegistryClient) -> Result<String> {
    info!("reading upstream package index");
    let index = client.fetch_package_index()?;
    Ok(current_csv(&index)?)
}

fn chain_registry_bundles(
    settings: &RunSettings,
    client: &dyn RegistryClient,
    stderr: &mut dyn Write,
) -> Result<String> {
    let collection = collect_records(settings, client)?;
    let chain = build_chain(collection)?;

    if let Some(outdir) = &settings.outdir {
        let written = write_chain(&chain, outdir)?;
        if !settings.quiet {
            write_stderr_line(stderr, summary_message(written.len(), outdir));
        }
    }
    Ok(chain.latest().name().to_owned())
}

/// Fetch, verify, open, and extract every listed bundle in listing order.
///
/// # Errors
///
/// Any per-bundle failure aborts the whole collection.
pub fn collect_records(
    settings: &RunSettings,
    client: &dyn RegistryClient,
) -> Result<CsvCollection> {
    let listing = client.fetch_bundle_listing(&settings.package)?;
    let digests = parse_listing(&listing)?;
    info!("{} bundle(s) listed for {}", digests.len(), settings.package);

    let mut collection = CsvCollection::default();
    for digest in &digests {
        debug!("fetching bundle {}", digest.short());
        let bytes = client.fetch_blob(&settings.package, digest)?;
        settings.verification.verify(digest, &bytes)?;

        let archive = BundleArchive::from_bytes(&bytes).map_err(|source| {
            CollectorError::Archive {
                digest: digest.clone(),
                source,
            }
        })?;
        let records = extract_records(&archive).map_err(|source| CollectorError::Extraction {
            digest: digest.clone(),
            source,
        })?;
        debug!("bundle {} yielded {} CSV(s)", digest.short(), records.len());
        collection.extend(records);
    }
    info!("collected {} distinct CSV version(s)", collection.len());
    Ok(collection)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
