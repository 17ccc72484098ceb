//! Artifact download and install hand-off
//!
//! The transfer itself runs in a host download facility. The fetcher only
//! enqueues it, and later resolves the finished file and passes it to the
//! host's install launcher.

use std::path::PathBuf;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use reqwest::Url;
use tracing::{error, info, warn};

use crate::config::UpdateConfig;
use crate::update::error::{DownloadError, LaunchError};
use crate::update::types::DownloadJobHandle;

/// A background download to enqueue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    /// Human-visible title shown while the download runs
    pub title: String,
    pub description: String,
    pub destination_dir: PathBuf,
    pub file_name: String,
    /// Whether the transfer may use metered networks
    pub allow_metered: bool,
}

/// A file to hand to the host's open/install flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub uri: Url,
    pub mime_type: String,
    /// Grant the receiving process read access to `uri` and nothing more
    pub grant_read_permission: bool,
}

/// Host facility that runs downloads outside the caller's flow
#[cfg_attr(test, automock)]
pub trait DownloadFacility: Send + Sync {
    /// Enqueues `request` and returns immediately
    fn enqueue(&self, request: DownloadRequest) -> Result<DownloadJobHandle, DownloadError>;

    /// Local URI of the finished download
    ///
    /// `None` if the job failed, was cancelled, is still running or is unknown.
    fn resolve_uri(&self, handle: DownloadJobHandle) -> Result<Option<Url>, DownloadError>;
}

/// Host launcher for the generic "open/install this file" action
#[cfg_attr(test, automock)]
pub trait InstallLauncher: Send + Sync {
    fn launch(&self, request: &LaunchRequest) -> Result<(), LaunchError>;
}

pub struct ArtifactFetcher {
    facility: Arc<dyn DownloadFacility>,
    launcher: Arc<dyn InstallLauncher>,
    config: Arc<UpdateConfig>,
    destination_dir: PathBuf,
}

impl ArtifactFetcher {
    pub fn new(
        facility: Arc<dyn DownloadFacility>,
        launcher: Arc<dyn InstallLauncher>,
        config: Arc<UpdateConfig>,
        destination_dir: PathBuf,
    ) -> Self {
        Self {
            facility,
            launcher,
            config,
            destination_dir,
        }
    }

    /// Enqueues the download of `url` into `file_name`.
    pub fn download(
        &self,
        url: &str,
        file_name: &str,
    ) -> Result<DownloadJobHandle, DownloadError> {
        let request = DownloadRequest {
            url: url.to_string(),
            title: self.config.download_notification_title.clone(),
            description: self.config.download_notification_description.clone(),
            destination_dir: self.destination_dir.clone(),
            file_name: file_name.to_string(),
            allow_metered: true,
        };

        let handle = self.facility.enqueue(request)?;
        info!("Enqueued download {} of {} as {}", handle, url, file_name);
        Ok(handle)
    }

    /// Launches installation of the finished download behind `handle`.
    ///
    /// Does nothing (apart from logging) when the download cannot be resolved
    /// or the launcher fails.
    pub fn resolve_and_install(&self, handle: DownloadJobHandle) {
        let uri = match self.facility.resolve_uri(handle) {
            Ok(Some(uri)) => uri,
            Ok(None) => {
                warn!("Download {} has no local file to install", handle);
                return;
            }
            Err(e) => {
                error!("Failed to resolve download {}: {}", handle, e);
                return;
            }
        };

        let request = LaunchRequest {
            uri,
            mime_type: self.config.artifact_mime_type.clone(),
            grant_read_permission: true,
        };

        match self.launcher.launch(&request) {
            Ok(()) => info!("Launched install of {}", request.uri),
            Err(e) => error!("Failed to launch install of {}: {}", request.uri, e),
        }
    }
}
