use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Remote API constants
// =============================================================================

/// Default base URL for the GitHub REST API
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Timeout for release fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// User agent sent with every release request
pub const USER_AGENT: &str = "release-updater";

// =============================================================================
// Artifact constants
// =============================================================================

/// Installable artifact extension used when none is configured
pub const DEFAULT_ARTIFACT_EXTENSION: &str = ".apk";

/// MIME type handed to the install launcher when none is configured
pub const DEFAULT_ARTIFACT_MIME_TYPE: &str = "application/vnd.android.package-archive";

/// Key under which the dismissed version is persisted
pub const DISMISSED_VERSION_KEY: &str = "dismissed_update_version";

/// Static update configuration supplied by the embedding application
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateConfig {
    pub repo_owner: String,
    pub repo_name: String,
    /// Prefix of downloaded artifact file names
    pub artifact_base_name: String,
    pub download_notification_title: String,
    pub download_notification_description: String,
    /// Asset name suffix that marks a release attachment as installable
    pub artifact_extension: String,
    pub artifact_mime_type: String,
    pub api_base_url: String,
    /// Release fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,
    /// Optional token sent as a bearer credential (raises API rate limits)
    pub github_token: Option<String>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            repo_owner: String::new(),
            repo_name: String::new(),
            artifact_base_name: "app".to_string(),
            download_notification_title: "Downloading update".to_string(),
            download_notification_description: String::new(),
            artifact_extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
            artifact_mime_type: DEFAULT_ARTIFACT_MIME_TYPE.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
            github_token: None,
        }
    }
}

impl UpdateConfig {
    /// Parses the configuration object handed over by the embedding application
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// File name for the artifact of `version_name`: `{base}-{version}{extension}`.
    ///
    /// Distinct versions never share a file name.
    pub fn artifact_file_name(&self, version_name: &str) -> String {
        format!(
            "{}-{}{}",
            self.artifact_base_name, version_name, self.artifact_extension
        )
    }
}

/// Returns the path to the data directory for release-updater.
/// Uses $XDG_DATA_HOME/release-updater if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-updater,
/// or ./release-updater if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the database file.
pub fn db_path() -> PathBuf {
    data_dir().join("updater.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("release-updater.log")
}

/// Returns the directory downloaded artifacts are written to.
pub fn downloads_dir() -> PathBuf {
    data_dir().join("downloads")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-updater")
}
