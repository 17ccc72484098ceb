//! Domain records shared across the update subsystem

use serde::{Deserialize, Serialize};

/// An available release, mapped from a [`ReleaseDescriptor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    pub version_name: String,
    /// Web page of the release
    pub release_url: String,
    /// Download URL of the installable artifact, if the release has one
    pub artifact_url: Option<String>,
    pub artifact_size_bytes: Option<u64>,
    /// Release notes
    pub changelog: Option<String>,
}

/// Wire-level release as returned by the releases API
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseDescriptor {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Attachment of a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

/// Identifier of a background download job
///
/// A plain value: it can be persisted and resolved after a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadJobHandle(pub i64);

impl DownloadJobHandle {
    pub fn id(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for DownloadJobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
