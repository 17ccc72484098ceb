//! Release client trait for fetching release descriptors

#[cfg(test)]
use mockall::automock;

use crate::update::error::RemoteError;
use crate::update::types::{ReleaseDescriptor, UpdateInfo};

/// Trait for fetching release descriptors from a release index
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseClient: Send + Sync {
    /// Fetches the latest published release of `owner/repo`
    async fn fetch_latest(&self, owner: &str, repo: &str) -> Result<ReleaseDescriptor, RemoteError>;

    /// Fetches the release tagged `tag`
    ///
    /// # Returns
    /// * `Err(RemoteError::NotFound)` - If the tag does not exist
    async fn fetch_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<ReleaseDescriptor, RemoteError>;
}

/// Maps a descriptor into an [`UpdateInfo`].
///
/// The first asset whose name ends with `artifact_extension` becomes the
/// download candidate. Without one, the artifact fields stay `None`.
pub fn to_update_info(descriptor: ReleaseDescriptor, artifact_extension: &str) -> UpdateInfo {
    let artifact = descriptor
        .assets
        .iter()
        .find(|asset| asset.name.ends_with(artifact_extension));

    UpdateInfo {
        artifact_url: artifact.map(|a| a.browser_download_url.clone()),
        artifact_size_bytes: artifact.map(|a| a.size),
        version_name: descriptor.tag_name,
        release_url: descriptor.html_url,
        changelog: descriptor.body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::types::ReleaseAsset;

    fn asset(name: &str, size: u64) -> ReleaseAsset {
        ReleaseAsset {
            name: name.to_string(),
            browser_download_url: format!("https://example.com/download/{}", name),
            size,
        }
    }

    fn descriptor(assets: Vec<ReleaseAsset>) -> ReleaseDescriptor {
        ReleaseDescriptor {
            tag_name: "1.2.0".to_string(),
            name: Some("1.2.0".to_string()),
            html_url: "https://github.com/acme/journal/releases/tag/1.2.0".to_string(),
            body: Some("- fixed mood colors".to_string()),
            assets,
        }
    }

    #[test]
    fn to_update_info_picks_first_matching_asset() {
        let info = to_update_info(
            descriptor(vec![
                asset("checksums.txt", 10),
                asset("journal-release.apk", 4096),
                asset("journal-debug.apk", 8192),
            ]),
            ".apk",
        );

        assert_eq!(
            info,
            UpdateInfo {
                version_name: "1.2.0".to_string(),
                release_url: "https://github.com/acme/journal/releases/tag/1.2.0".to_string(),
                artifact_url: Some(
                    "https://example.com/download/journal-release.apk".to_string()
                ),
                artifact_size_bytes: Some(4096),
                changelog: Some("- fixed mood colors".to_string()),
            }
        );
    }

    #[test]
    fn to_update_info_without_matching_asset_has_no_artifact() {
        let info = to_update_info(
            descriptor(vec![asset("source.tar.gz", 100), asset("apk.txt", 1)]),
            ".apk",
        );

        assert_eq!(info.artifact_url, None);
        assert_eq!(info.artifact_size_bytes, None);
        assert_eq!(info.version_name, "1.2.0");
    }
}
