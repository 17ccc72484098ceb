//! Desktop implementations of the host capabilities the update core consumes
//!
//! - [`storage`]: SQLite key-value store for the dismissed version
//! - [`download`]: background HTTP downloads with persisted job handles
//! - [`launcher`]: hands finished artifacts to the platform opener
//! - [`db`]: shared database opening and schema migrations

pub mod db;
pub mod download;
pub mod launcher;
pub mod storage;

pub use download::LocalDownloadManager;
pub use launcher::SystemLauncher;
pub use storage::SqliteKeyValueStore;

use std::path::Path;
use std::sync::Arc;

use crate::config::UpdateConfig;
use crate::update::error::StoreError;
use crate::update::fetcher::ArtifactFetcher;
use crate::update::github::GitHubReleaseClient;
use crate::update::store::DismissalStore;
use crate::update::usecases::Updater;

/// Builds an [`Updater`] wired to the GitHub API and the desktop capabilities.
///
/// Dismissal state and download jobs share the database at `db_path`.
pub fn desktop_updater(
    config: UpdateConfig,
    current_version: &str,
    db_path: &Path,
    downloads_dir: &Path,
) -> Result<Updater, StoreError> {
    let config = Arc::new(config);

    let client = Arc::new(GitHubReleaseClient::from_config(&config));
    let dismissal = DismissalStore::new(Arc::new(SqliteKeyValueStore::new(db_path)?));
    let fetcher = ArtifactFetcher::new(
        Arc::new(LocalDownloadManager::new(db_path)?),
        Arc::new(SystemLauncher::default()),
        config.clone(),
        downloads_dir.to_path_buf(),
    );

    Ok(Updater::new(
        config,
        current_version,
        client,
        dismissal,
        fetcher,
    ))
}
