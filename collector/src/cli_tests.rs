//! Tests for collector CLI parsing and default behaviours.

use super::*;
use rstest::rstest;

#[test]
fn cli_parses_defaults() {
    let cli = Cli::parse_from(["collect-csvs"]);
    assert_eq!(cli.outdir, "target");
    assert_eq!(cli.source, "redhat");
    assert!(cli.config.is_none());
    assert!(cli.package.is_none());
    assert!(cli.timeout.is_none());
    assert!(cli.retries.is_none());
    assert!(!cli.skip_verify);
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);
}

#[test]
fn default_impl_matches_parsed_defaults() {
    let parsed = Cli::parse_from(["collect-csvs"]);
    let built = Cli::default();
    assert_eq!(parsed.outdir, built.outdir);
    assert_eq!(parsed.source, built.source);
}

#[test]
fn cli_accepts_any_source_text() {
    // Rejected later by `Source::from_str`.
    let cli = Cli::parse_from(["collect-csvs", "--source", "bogus"]);
    assert_eq!(cli.source, "bogus");
}

#[test]
fn empty_outdir_disables_writing() {
    let cli = Cli::parse_from(["collect-csvs", "--outdir", ""]);
    assert!(cli.output_dir().is_none());
}

#[test]
fn outdir_is_returned_as_path() {
    let cli = Cli::parse_from(["collect-csvs", "--outdir", "/tmp/csvs"]);
    assert_eq!(cli.output_dir(), Some(Utf8PathBuf::from("/tmp/csvs")));
}

#[test]
fn package_flag_is_validated() {
    let result = Cli::try_parse_from(["collect-csvs", "--package", "no-namespace"]);
    assert!(result.is_err());
}

#[test]
fn verbose_and_quiet_conflict() {
    let result = Cli::try_parse_from(["collect-csvs", "-v", "-q"]);
    assert!(result.is_err());
}

#[rstest]
#[case::default(&["collect-csvs"], LevelFilter::Warn)]
#[case::verbose(&["collect-csvs", "-v"], LevelFilter::Info)]
#[case::very_verbose(&["collect-csvs", "-vv"], LevelFilter::Debug)]
#[case::trace(&["collect-csvs", "-vvv"], LevelFilter::Trace)]
#[case::quiet(&["collect-csvs", "--quiet"], LevelFilter::Error)]
fn log_level_follows_flags(#[case] args: &[&str], #[case] expected: LevelFilter) {
    let cli = Cli::parse_from(args);
    assert_eq!(cli.log_level(), expected);
}
