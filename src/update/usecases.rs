//! Orchestration use cases and the facade exposed to the application

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::UpdateConfig;
use crate::update::checker::UpdateChecker;
use crate::update::error::RemoteError;
use crate::update::fetcher::ArtifactFetcher;
use crate::update::release::{ReleaseClient, to_update_info};
use crate::update::store::DismissalStore;
use crate::update::types::{DownloadJobHandle, UpdateInfo};

pub struct CheckForUpdateUseCase {
    checker: UpdateChecker,
}

impl CheckForUpdateUseCase {
    pub fn new(checker: UpdateChecker) -> Self {
        Self { checker }
    }

    pub async fn execute(&self, force_check: bool) -> Option<UpdateInfo> {
        self.checker.check(force_check).await
    }
}

pub struct DismissUpdateUseCase {
    dismissal: DismissalStore,
}

impl DismissUpdateUseCase {
    pub fn new(dismissal: DismissalStore) -> Self {
        Self { dismissal }
    }

    /// Records `version` as dismissed. The value is not validated.
    pub fn execute(&self, version: &str) {
        match self.dismissal.set_dismissed_version(version) {
            Ok(()) => info!("Dismissed update {}", version),
            Err(e) => error!("Failed to persist dismissed version {}: {}", version, e),
        }
    }
}

pub struct DownloadUpdateUseCase {
    fetcher: Arc<ArtifactFetcher>,
    config: Arc<UpdateConfig>,
}

impl DownloadUpdateUseCase {
    pub fn new(fetcher: Arc<ArtifactFetcher>, config: Arc<UpdateConfig>) -> Self {
        Self { fetcher, config }
    }

    /// Enqueues the artifact download of `update`.
    ///
    /// Returns `None` when the release has no artifact or enqueueing fails.
    pub fn execute(&self, update: &UpdateInfo) -> Option<DownloadJobHandle> {
        let Some(url) = update.artifact_url.as_deref() else {
            warn!("Release {} has no artifact to download", update.version_name);
            return None;
        };

        let file_name = self.config.artifact_file_name(&update.version_name);

        self.fetcher
            .download(url, &file_name)
            .inspect_err(|e| error!("Failed to enqueue download of {}: {}", url, e))
            .ok()
    }
}

/// Looks up the release notes of the installed version
pub struct GetCurrentVersionInfoUseCase {
    client: Arc<dyn ReleaseClient>,
    config: Arc<UpdateConfig>,
    current_version: String,
}

impl GetCurrentVersionInfoUseCase {
    pub fn new(
        client: Arc<dyn ReleaseClient>,
        config: Arc<UpdateConfig>,
        current_version: &str,
    ) -> Self {
        Self {
            client,
            config,
            current_version: current_version.to_string(),
        }
    }

    /// Fetches the release tagged with the installed version.
    ///
    /// If no such tag exists and the version has no `v` prefix, `v{version}`
    /// is tried once. Any error yields `None`.
    pub async fn execute(&self) -> Option<UpdateInfo> {
        let owner = &self.config.repo_owner;
        let repo = &self.config.repo_name;
        let tag = &self.current_version;

        let result = match self.client.fetch_by_tag(owner, repo, tag).await {
            Err(RemoteError::NotFound(_)) if !tag.starts_with('v') => {
                debug!("Tag {} not found, trying v{}", tag, tag);
                self.client
                    .fetch_by_tag(owner, repo, &format!("v{}", tag))
                    .await
            }
            other => other,
        };

        result
            .map(|descriptor| to_update_info(descriptor, &self.config.artifact_extension))
            .inspect_err(|e| warn!("Failed to fetch release notes for {}: {}", tag, e))
            .ok()
    }
}

/// Entry point for the rest of the application
pub struct Updater {
    check: CheckForUpdateUseCase,
    dismiss: DismissUpdateUseCase,
    download: DownloadUpdateUseCase,
    current_info: GetCurrentVersionInfoUseCase,
    fetcher: Arc<ArtifactFetcher>,
}

impl Updater {
    pub fn new(
        config: Arc<UpdateConfig>,
        current_version: &str,
        client: Arc<dyn ReleaseClient>,
        dismissal: DismissalStore,
        fetcher: ArtifactFetcher,
    ) -> Self {
        let fetcher = Arc::new(fetcher);

        let checker = UpdateChecker::new(
            client.clone(),
            dismissal.clone(),
            config.clone(),
            current_version,
        );

        Self {
            check: CheckForUpdateUseCase::new(checker),
            dismiss: DismissUpdateUseCase::new(dismissal),
            download: DownloadUpdateUseCase::new(fetcher.clone(), config.clone()),
            current_info: GetCurrentVersionInfoUseCase::new(client, config, current_version),
            fetcher,
        }
    }

    pub async fn check_for_update(&self, force_check: bool) -> Option<UpdateInfo> {
        self.check.execute(force_check).await
    }

    pub fn dismiss(&self, version: &str) {
        self.dismiss.execute(version)
    }

    pub fn download(&self, update: &UpdateInfo) -> Option<DownloadJobHandle> {
        self.download.execute(update)
    }

    pub fn install(&self, handle: DownloadJobHandle) {
        self.fetcher.resolve_and_install(handle)
    }

    pub async fn current_version_changelog(&self) -> Option<UpdateInfo> {
        self.current_info.execute().await
    }
}
