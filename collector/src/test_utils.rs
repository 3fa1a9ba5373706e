//! Shared test utilities for the collector crate.
//!
//! Builders for CSV documents, bundle descriptors, registry listings, and
//! in-memory tarballs, plus a [`StubRegistry`] that serves them.

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_yaml_ng::{Mapping, Value};
use std::cell::RefCell;
use std::io::Write;

use crate::registry::digest::Digest;
use crate::registry::download::{DownloadError, RegistryClient};
use crate::registry::package::PackageId;

/// Archive path used for descriptors built by [`descriptor_bundle`].
pub const DESCRIPTOR_PATH: &str = "instana-agent/bundle.yaml";

/// Builds a minimal CSV document in block style.
///
/// `spec.version` is the last key, so a linked `replaces` is written after
/// it. The version is quoted so values such as `1.1` stay strings.
pub fn csv_yaml(name: &str, version: &str, maturity: &str) -> String {
    format!(
        concat!(
            "apiVersion: operators.coreos.com/v1alpha1\n",
            "kind: ClusterServiceVersion\n",
            "metadata:\n",
            "  name: {name}\n",
            "spec:\n",
            "  displayName: Instana Agent Operator\n",
            "  maturity: {maturity}\n",
            "  version: \"{version}\"\n",
        ),
        name = name,
        maturity = maturity,
        version = version,
    )
}

/// Builds a bundle descriptor embedding `csvs` as one multi-document string.
pub fn descriptor_yaml(csvs: &[String]) -> String {
    let mut data = Mapping::new();
    data.insert(
        Value::from("clusterServiceVersions"),
        Value::from(csvs.join("---\n")),
    );
    let mut descriptor = Mapping::new();
    descriptor.insert(Value::from("data"), Value::Mapping(data));
    serde_yaml_ng::to_string(&descriptor).expect("descriptor serializes")
}

/// Builds an upstream package index whose first channel points at `current`.
pub fn package_index_yaml(current: &str) -> String {
    format!("packageName: instana-agent\nchannels:\n- name: beta\n  currentCSV: {current}\n")
}

/// Builds a registry listing naming `digests` in order.
pub fn listing_json(digests: &[Digest]) -> String {
    let descriptors: Vec<serde_json::Value> = digests
        .iter()
        .enumerate()
        .map(|(index, digest)| {
            serde_json::json!({
                "package": "certified-operators/instana-agent",
                "release": format!("0.0.{index}"),
                "content": {
                    "digest": digest.as_str(),
                    "mediaType": "application/vnd.cnr.package.v0.1+tar+gzip",
                },
            })
        })
        .collect();
    serde_json::Value::Array(descriptors).to_string()
}

/// Builds an uncompressed tar archive holding `files` as regular entries.
pub fn tar_archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .expect("append tar entry");
    }
    builder.into_inner().expect("finish tar archive")
}

/// Builds a gzip-compressed tar archive holding `files`.
pub fn gzip_tar_archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&tar_archive(files))
        .expect("compress tar archive");
    encoder.finish().expect("finish gzip stream")
}

/// Builds a gzip tarball whose descriptor embeds `csvs`.
pub fn descriptor_bundle(csvs: &[String]) -> Vec<u8> {
    gzip_tar_archive(&[(DESCRIPTOR_PATH, descriptor_yaml(csvs).as_str())])
}

/// A registry serving fixed documents, recording every request.
#[derive(Debug, Default)]
pub struct StubRegistry {
    index: Option<String>,
    blobs: Vec<(Digest, Vec<u8>)>,
    requests: RefCell<Vec<String>>,
}

impl StubRegistry {
    /// Creates a registry serving `index` as the upstream package index.
    pub fn with_index(index: impl Into<String>) -> Self {
        Self {
            index: Some(index.into()),
            ..Self::default()
        }
    }

    /// Appends a bundle to the listing under the digest of its bytes.
    pub fn push_bundle(&mut self, bytes: Vec<u8>) -> Digest {
        let digest = Digest::of(&bytes);
        self.push_blob(digest.clone(), bytes);
        digest
    }

    /// Appends a blob to the listing under an arbitrary digest.
    pub fn push_blob(&mut self, digest: Digest, bytes: Vec<u8>) {
        self.blobs.push((digest, bytes));
    }

    /// Requests served so far, as `index`, `listing <package>`, or
    /// `blob <digest>`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn record(&self, request: String) {
        self.requests.borrow_mut().push(request);
    }
}

impl RegistryClient for StubRegistry {
    fn fetch_package_index(&self) -> Result<String, DownloadError> {
        self.record("index".to_owned());
        self.index.clone().ok_or_else(|| DownloadError::NotFound {
            url: "stub://index".to_owned(),
        })
    }

    fn fetch_bundle_listing(&self, package: &PackageId) -> Result<String, DownloadError> {
        self.record(format!("listing {package}"));
        let digests: Vec<Digest> = self.blobs.iter().map(|(digest, _)| digest.clone()).collect();
        Ok(listing_json(&digests))
    }

    fn fetch_blob(&self, _package: &PackageId, digest: &Digest) -> Result<Vec<u8>, DownloadError> {
        self.record(format!("blob {digest}"));
        self.blobs
            .iter()
            .rev()
            .find(|(stored, _)| stored == digest)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| DownloadError::NotFound {
                url: format!("stub://blobs/{digest}"),
            })
    }
}
