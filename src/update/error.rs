use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request timed out")]
    Timeout,

    #[error("No connectivity: {0}")]
    NoConnectivity(String),

    #[error("Server error: status {status}")]
    Server { status: u16 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown remote error: {0}")]
    Unknown(String),
}

impl RemoteError {
    /// Whether retrying the same request later could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RemoteError::Timeout
                | RemoteError::NoConnectivity(_)
                | RemoteError::Server { .. }
                | RemoteError::RateLimited { .. }
        )
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else if e.is_connect() {
            RemoteError::NoConnectivity(e.to_string())
        } else if e.is_decode() {
            RemoteError::InvalidResponse(e.to_string())
        } else {
            RemoteError::Unknown(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Download store error: {0}")]
    Store(#[from] StoreError),

    #[error("No async runtime available to run the download")]
    NoRuntime,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected download status: {0}")]
    Status(u16),

    #[error("Invalid download URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to start opener: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported URI for launching: {0}")]
    UnsupportedUri(String),
}
