//! Update availability decision

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::UpdateConfig;
use crate::update::comparator::is_newer;
use crate::update::release::{ReleaseClient, to_update_info};
use crate::update::store::DismissalStore;
use crate::update::types::UpdateInfo;

/// Decides whether a newer release should be offered to the user
pub struct UpdateChecker {
    client: Arc<dyn ReleaseClient>,
    dismissal: DismissalStore,
    config: Arc<UpdateConfig>,
    current_version: String,
}

impl UpdateChecker {
    pub fn new(
        client: Arc<dyn ReleaseClient>,
        dismissal: DismissalStore,
        config: Arc<UpdateConfig>,
        current_version: &str,
    ) -> Self {
        Self {
            client,
            dismissal,
            config,
            current_version: current_version.to_string(),
        }
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Returns the latest release if it should be offered.
    ///
    /// Checks run in a fixed order:
    /// 1. the release must be newer than the installed version
    /// 2. unless `force_check`, it must not be the dismissed version
    /// 3. it must carry an installable artifact
    ///
    /// A failed fetch is logged and reported as `None`. No retries.
    pub async fn check(&self, force_check: bool) -> Option<UpdateInfo> {
        let descriptor = match self
            .client
            .fetch_latest(&self.config.repo_owner, &self.config.repo_name)
            .await
        {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!(
                    "Update check for {}/{} failed: {}",
                    self.config.repo_owner, self.config.repo_name, e
                );
                return None;
            }
        };

        let info = to_update_info(descriptor, &self.config.artifact_extension);

        if !is_newer(&info.version_name, &self.current_version) {
            debug!(
                "Latest release {} is not newer than {}",
                info.version_name, self.current_version
            );
            return None;
        }

        if !force_check {
            let dismissed = self
                .dismissal
                .get_dismissed_version()
                .inspect_err(|e| warn!("Failed to read dismissed version: {}", e))
                .ok()
                .flatten();

            if dismissed.as_deref() == Some(info.version_name.as_str()) {
                debug!("Release {} was dismissed", info.version_name);
                return None;
            }
        }

        if info.artifact_url.is_none() {
            info!(
                "Release {} has no {} artifact",
                info.version_name, self.config.artifact_extension
            );
            return None;
        }

        info!(
            "Update available: {} -> {}",
            self.current_version, info.version_name
        );
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::error::RemoteError;
    use crate::update::release::MockReleaseClient;
    use crate::update::store::MockKeyValueStore;
    use crate::update::types::{ReleaseAsset, ReleaseDescriptor};
    use rstest::rstest;

    fn descriptor(tag: &str, with_artifact: bool) -> ReleaseDescriptor {
        let assets = if with_artifact {
            vec![ReleaseAsset {
                name: format!("journal-{}.apk", tag),
                browser_download_url: format!("https://example.com/{}.apk", tag),
                size: 1024,
            }]
        } else {
            vec![ReleaseAsset {
                name: "notes.txt".to_string(),
                browser_download_url: "https://example.com/notes.txt".to_string(),
                size: 12,
            }]
        };

        ReleaseDescriptor {
            tag_name: tag.to_string(),
            name: None,
            html_url: format!("https://github.com/acme/journal/releases/tag/{}", tag),
            body: None,
            assets,
        }
    }

    fn client_returning(descriptor: ReleaseDescriptor) -> MockReleaseClient {
        let mut client = MockReleaseClient::new();
        client
            .expect_fetch_latest()
            .times(1)
            .returning(move |_, _| Ok(descriptor.clone()));
        client
    }

    fn store_with_dismissed(dismissed: Option<&str>) -> MockKeyValueStore {
        let dismissed = dismissed.map(|s| s.to_string());
        let mut store = MockKeyValueStore::new();
        store
            .expect_get_string()
            .returning(move |_| Ok(dismissed.clone()));
        store
    }

    fn checker(client: MockReleaseClient, store: MockKeyValueStore) -> UpdateChecker {
        let config = UpdateConfig {
            repo_owner: "acme".to_string(),
            repo_name: "journal".to_string(),
            ..UpdateConfig::default()
        };
        UpdateChecker::new(
            Arc::new(client),
            DismissalStore::new(Arc::new(store)),
            Arc::new(config),
            "1.0.0",
        )
    }

    #[tokio::test]
    async fn check_returns_update_for_newer_release() {
        let checker = checker(
            client_returning(descriptor("1.1.0", true)),
            store_with_dismissed(None),
        );

        let info = checker.check(false).await.unwrap();

        assert_eq!(info.version_name, "1.1.0");
        assert_eq!(
            info.artifact_url.as_deref(),
            Some("https://example.com/1.1.0.apk")
        );
    }

    #[rstest]
    #[case("1.0.0")]
    #[case("0.9.9")]
    #[case("v1.0")]
    #[tokio::test]
    async fn check_returns_none_when_not_newer(#[case] tag: &str) {
        let mut store = MockKeyValueStore::new();
        store.expect_get_string().times(0);

        let checker = checker(client_returning(descriptor(tag, true)), store);

        assert_eq!(checker.check(false).await, None);
    }

    #[tokio::test]
    async fn check_returns_none_for_dismissed_version() {
        let checker = checker(
            client_returning(descriptor("1.1.0", true)),
            store_with_dismissed(Some("1.1.0")),
        );

        assert_eq!(checker.check(false).await, None);
    }

    #[tokio::test]
    async fn check_compares_dismissed_version_by_exact_string() {
        let checker = checker(
            client_returning(descriptor("1.1.0", true)),
            store_with_dismissed(Some("v1.1.0")),
        );

        assert!(checker.check(false).await.is_some());
    }

    #[tokio::test]
    async fn forced_check_ignores_dismissal_without_reading_store() {
        let mut store = MockKeyValueStore::new();
        store.expect_get_string().times(0);

        let checker = checker(client_returning(descriptor("1.1.0", true)), store);

        let info = checker.check(true).await.unwrap();
        assert_eq!(info.version_name, "1.1.0");
    }

    #[tokio::test]
    async fn check_returns_none_without_installable_artifact() {
        let checker = checker(
            client_returning(descriptor("2.0.0", false)),
            store_with_dismissed(None),
        );

        assert_eq!(checker.check(false).await, None);
    }

    #[rstest]
    #[case(RemoteError::Timeout)]
    #[case(RemoteError::NoConnectivity("offline".to_string()))]
    #[case(RemoteError::Server { status: 500 })]
    #[case(RemoteError::NotFound("acme/journal".to_string()))]
    #[case(RemoteError::Unknown("boom".to_string()))]
    #[tokio::test]
    async fn check_returns_none_on_remote_error(#[case] error: RemoteError) {
        let mut client = MockReleaseClient::new();
        client
            .expect_fetch_latest()
            .times(1)
            .return_once(move |_, _| Err(error));
        let mut store = MockKeyValueStore::new();
        store.expect_get_string().times(0);

        let checker = checker(client, store);

        assert_eq!(checker.check(false).await, None);
    }

    #[tokio::test]
    async fn check_treats_unreadable_dismissal_as_not_dismissed() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get_string()
            .returning(|_| Err(crate::update::error::StoreError::LockPoisoned));

        let checker = checker(client_returning(descriptor("1.1.0", true)), store);

        assert!(checker.check(false).await.is_some());
    }
}
