//! Unit tests for the collection run.

use super::*;
use crate::csv::chain::ChainError;
use crate::registry::digest::Digest;
use crate::registry::download::{DownloadError, MockRegistryClient};
use crate::test_utils::{
    csv_yaml, descriptor_bundle, gzip_tar_archive, listing_json, package_index_yaml,
};
use camino::Utf8Path;
use rstest::rstest;
use std::collections::HashMap;

fn outdir() -> (tempfile::TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(temp.path().join("target")).expect("UTF-8 path");
    (temp, path)
}

fn settings(outdir: Option<&Utf8Path>) -> RunSettings {
    RunSettings {
        outdir: outdir.map(Utf8Path::to_owned),
        ..RunSettings::default()
    }
}

/// A mock registry that lists `bundles` in order and serves each blob.
fn registry_serving(bundles: Vec<Vec<u8>>) -> MockRegistryClient {
    let digests: Vec<Digest> = bundles.iter().map(|bytes| Digest::of(bytes)).collect();
    let listing = listing_json(&digests);
    let blobs: HashMap<Digest, Vec<u8>> = digests.into_iter().zip(bundles).collect();

    let mut client = MockRegistryClient::new();
    client.expect_fetch_package_index().never();
    client
        .expect_fetch_bundle_listing()
        .withf(|package| package.name() == "instana-agent")
        .times(1)
        .returning(move |_| Ok(listing.clone()));
    client.expect_fetch_blob().returning(move |_, digest| {
        blobs.get(digest).cloned().ok_or_else(|| DownloadError::NotFound {
            url: digest.to_string(),
        })
    });
    client
}

#[test]
fn olm_source_prints_current_csv_without_writing() {
    let (_temp, dir) = outdir();
    let mut client = MockRegistryClient::new();
    client
        .expect_fetch_package_index()
        .times(1)
        .returning(|| Ok(package_index_yaml("instana-agent.v1.2.3")));
    client.expect_fetch_bundle_listing().never();
    client.expect_fetch_blob().never();

    let mut stderr = Vec::new();
    let latest = run_with(Source::Olm, &settings(Some(&dir)), &client, &mut stderr)
        .expect("olm run succeeds");

    assert_eq!(latest, "instana-agent.v1.2.3");
    assert!(!dir.exists(), "olm run must not create {dir}");
}

#[test]
fn redhat_source_chains_and_writes_every_bundle() {
    let (_temp, dir) = outdir();
    let client = registry_serving(vec![
        descriptor_bundle(&[
            csv_yaml("instana-agent.v1.0.0", "1.0.0", "stable"),
            csv_yaml("instana-agent.v1.1.0", "1.1.0", "alpha"),
        ]),
        descriptor_bundle(&[csv_yaml("instana-agent.v1.2.0", "1.2.0", "stable")]),
    ]);

    let mut stderr = Vec::new();
    let latest = run_with(Source::Redhat, &settings(Some(&dir)), &client, &mut stderr)
        .expect("redhat run succeeds");

    assert_eq!(latest, "instana-agent.v1.2.0");
    assert!(dir.join("instana-agent.v1.0.0.yaml").exists());
    assert!(dir.join("instana-agent.v1.2.0.yaml").exists());
    assert!(!dir.join("instana-agent.v1.1.0.yaml").exists());
    let written = std::fs::read_to_string(dir.join("instana-agent.v1.2.0.yaml")).expect("read");
    assert!(written.contains("replaces: instana-agent.v1.0.0"));

    let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
    assert!(stderr_text.contains(&format!("Wrote 2 CSVs to {dir}")));
}

#[test]
fn later_bundle_wins_for_duplicate_version() {
    let client = registry_serving(vec![
        descriptor_bundle(&[csv_yaml("instana-agent.v1.0.0-old", "1.0.0", "stable")]),
        descriptor_bundle(&[csv_yaml("instana-agent.v1.0.0-new", "1.0.0", "stable")]),
    ]);

    let collection = collect_records(&settings(None), &client).expect("collected");

    assert_eq!(collection.len(), 1);
    assert_eq!(
        collection.get("1.0.0").map(|record| record.name()),
        Some("instana-agent.v1.0.0-new")
    );
}

#[test]
fn standalone_manifest_bundles_are_collected() {
    let manifest = csv_yaml("instana-agent.v0.9.0", "0.9.0", "stable");
    let client = registry_serving(vec![tar_of_manifest(&manifest)]);

    let collection = collect_records(&settings(None), &client).expect("collected");

    assert_eq!(
        collection.get("0.9.0").map(|record| record.name()),
        Some("instana-agent.v0.9.0")
    );
}

fn tar_of_manifest(manifest: &str) -> Vec<u8> {
    gzip_tar_archive(&[
        ("instana-agent/0.9.0/instana-agent.v0.9.0.clusterserviceversion.yaml", manifest),
        ("instana-agent/instana-agent.package.yaml", "packageName: instana-agent\n"),
    ])
}

#[rstest]
#[case::quiet(true, "")]
#[case::verbose(false, "Wrote 1 CSV to ")]
fn summary_respects_quiet(#[case] quiet: bool, #[case] expected: &str) {
    let (_temp, dir) = outdir();
    let client = registry_serving(vec![descriptor_bundle(&[csv_yaml(
        "instana-agent.v1.0.0",
        "1.0.0",
        "stable",
    )])]);
    let settings = RunSettings {
        quiet,
        ..settings(Some(&dir))
    };

    let mut stderr = Vec::new();
    run_with(Source::Redhat, &settings, &client, &mut stderr).expect("run succeeds");

    let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
    if expected.is_empty() {
        assert!(stderr_text.is_empty(), "stderr: {stderr_text}");
    } else {
        assert!(stderr_text.contains(expected), "stderr: {stderr_text}");
    }
}

#[test]
fn disabled_outdir_still_reports_latest() {
    let client = registry_serving(vec![descriptor_bundle(&[csv_yaml(
        "instana-agent.v1.0.0",
        "1.0.0",
        "stable",
    )])]);

    let mut stderr = Vec::new();
    let latest =
        run_with(Source::Redhat, &settings(None), &client, &mut stderr).expect("run succeeds");

    assert_eq!(latest, "instana-agent.v1.0.0");
    assert!(stderr.is_empty());
}

#[test]
fn only_alpha_versions_is_an_explicit_error() {
    let client = registry_serving(vec![descriptor_bundle(&[csv_yaml(
        "instana-agent.v1.0.0",
        "1.0.0",
        "alpha",
    )])]);

    let mut stderr = Vec::new();
    let err = run_with(Source::Redhat, &settings(None), &client, &mut stderr)
        .expect_err("no eligible versions");

    assert!(matches!(
        err,
        CollectorError::Chain(ChainError::NoEligibleVersions { collected: 1 })
    ));
}

#[test]
fn digest_mismatch_aborts_before_extraction() {
    let claimed = Digest::of(b"what the listing promised");
    let listing = listing_json(std::slice::from_ref(&claimed));
    let mut client = MockRegistryClient::new();
    client
        .expect_fetch_bundle_listing()
        .returning(move |_| Ok(listing.clone()));
    client.expect_fetch_blob().times(1).returning(|_, _| {
        Ok(descriptor_bundle(&[csv_yaml(
            "instana-agent.v1.0.0",
            "1.0.0",
            "stable",
        )]))
    });

    let err = collect_records(&settings(None), &client).expect_err("mismatch");

    match err {
        CollectorError::DigestMismatch(mismatch) => assert_eq!(mismatch.expected, claimed),
        other => panic!("expected DigestMismatch, got {other:?}"),
    }
}

#[test]
fn skipping_verification_accepts_mismatched_blob() {
    let claimed = Digest::of(b"what the listing promised");
    let listing = listing_json(std::slice::from_ref(&claimed));
    let mut client = MockRegistryClient::new();
    client
        .expect_fetch_bundle_listing()
        .returning(move |_| Ok(listing.clone()));
    client.expect_fetch_blob().returning(|_, _| {
        Ok(descriptor_bundle(&[csv_yaml(
            "instana-agent.v1.0.0",
            "1.0.0",
            "stable",
        )]))
    });
    let settings = RunSettings {
        verification: VerificationPolicy::new(false),
        ..settings(None)
    };

    let collection = collect_records(&settings, &client).expect("collected");

    assert_eq!(collection.len(), 1);
}

#[test]
fn unreadable_blob_names_its_digest() {
    let client = registry_serving(vec![b"definitely not a tarball".to_vec()]);

    let err = collect_records(&settings(None), &client).expect_err("unreadable archive");

    assert!(matches!(err, CollectorError::Archive { .. }));
    assert!(err.to_string().contains(Digest::of(b"definitely not a tarball").as_str()));
}

#[test]
fn listing_failure_is_fatal() {
    let mut client = MockRegistryClient::new();
    client.expect_fetch_bundle_listing().returning(|_| {
        Err(DownloadError::NotFound {
            url: "https://registry.test/packages/x/y/".to_owned(),
        })
    });
    client.expect_fetch_blob().never();

    let err = collect_records(&settings(None), &client).expect_err("listing failed");

    assert!(matches!(
        err,
        CollectorError::Download(DownloadError::NotFound { .. })
    ));
}

#[test]
fn unrecognized_source_fails_before_any_work() {
    let cli = Cli {
        source: "bogus".to_owned(),
        outdir: String::new(),
        config: Some(Utf8PathBuf::from("/nonexistent/collector.toml")),
        ..Cli::default()
    };

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let err = run(&cli, &mut stdout, &mut stderr).expect_err("bogus source");

    assert!(matches!(err, CollectorError::UnrecognizedSource { ref value } if value == "bogus"));
    assert!(stdout.is_empty());
}

#[test]
fn missing_config_file_is_reported() {
    let cli = Cli {
        config: Some(Utf8PathBuf::from("/nonexistent/collector.toml")),
        ..Cli::default()
    };

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let err = run(&cli, &mut stdout, &mut stderr).expect_err("missing config");

    assert!(matches!(err, CollectorError::Config(_)));
    assert!(err.to_string().contains("/nonexistent/collector.toml"));
}
