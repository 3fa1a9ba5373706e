//! CLI argument definitions for the CSV collector.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

use crate::registry::package::PackageId;

/// Collect historical operator CSVs and link them into an upgrade chain.
#[derive(Parser, Debug)]
#[command(name = "collect-csvs")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch old CSVs for the operator, dump them to the output directory, and ",
    "print the latest version.\n\n",
    "With --source redhat (the default) every bundle published for the package ",
    "is downloaded, its ClusterServiceVersions are ordered by semantic version, ",
    "alpha releases are dropped, and each remaining CSV is rewritten so that ",
    "spec.replaces names its predecessor.\n\n",
    "With --source olm only the upstream package index is read and its current ",
    "CSV is printed.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Write the chained CSVs to ./target and print the latest name:\n",
    "    $ collect-csvs\n\n",
    "  Print the latest name without writing files:\n",
    "    $ collect-csvs --outdir ''\n\n",
    "  Print the current upstream community version:\n",
    "    $ collect-csvs --source olm\n",
))]
pub struct Cli {
    /// Target directory for the collected CSVs; empty disables writing.
    #[arg(long, value_name = "DIR", default_value = "target")]
    pub outdir: String,

    /// Where to read versions from: "redhat" or "olm".
    #[arg(long, value_name = "SOURCE", default_value = "redhat")]
    pub source: String,

    /// TOML file with registry endpoints and network settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Registry package to collect, as <namespace>/<name>.
    #[arg(long, value_name = "NAMESPACE/NAME")]
    pub package: Option<PackageId>,

    /// Override the bundle registry API base URL.
    #[arg(long, value_name = "URL")]
    pub registry_url: Option<String>,

    /// Override the upstream package index URL.
    #[arg(long, value_name = "URL")]
    pub index_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Retries after a transient request failure.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Do not check blob contents against their digests.
    #[arg(long)]
    pub skip_verify: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// The output directory, or `None` when writing is disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use csv_collector::cli::Cli;
    ///
    /// let cli = Cli::parse_from(["collect-csvs", "--outdir", ""]);
    /// assert!(cli.output_dir().is_none());
    /// ```
    #[must_use]
    pub fn output_dir(&self) -> Option<Utf8PathBuf> {
        (!self.outdir.is_empty()).then(|| Utf8PathBuf::from(&self.outdir))
    }

    /// Default log level derived from `-v`/`-q`; `RUST_LOG` may override it.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Default for Cli {
    /// Creates a `Cli` equal to running the binary without arguments.
    fn default() -> Self {
        Self {
            outdir: "target".to_owned(),
            source: "redhat".to_owned(),
            config: None,
            package: None,
            registry_url: None,
            index_url: None,
            timeout: None,
            retries: None,
            skip_verify: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
