//! Background artifact downloads for desktop hosts
//!
//! Jobs are recorded in SQLite so a [`DownloadJobHandle`] stays resolvable
//! after a restart. Transfers run as tokio tasks and write to a `.part` file
//! that is renamed into place once complete.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::StreamExt;
use reqwest::Url;
use rusqlite::{Connection, OptionalExtension};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use crate::config::USER_AGENT;
use crate::host::db;
use crate::update::error::{DownloadError, StoreError};
use crate::update::fetcher::{DownloadFacility, DownloadRequest};
use crate::update::types::DownloadJobHandle;

/// Progress is persisted at most once per this many bytes
const PROGRESS_INTERVAL_BYTES: u64 = 256 * 1024;

/// Lifecycle of a download job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    Pending,
    Running,
    Successful,
    Failed,
}

impl DownloadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadState::Pending => "pending",
            DownloadState::Running => "running",
            DownloadState::Successful => "successful",
            DownloadState::Failed => "failed",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DownloadState::Pending),
            "running" => Some(DownloadState::Running),
            "successful" => Some(DownloadState::Successful),
            "failed" => Some(DownloadState::Failed),
            _ => None,
        }
    }
}

/// Snapshot of a download job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadStatus {
    pub state: DownloadState,
    pub destination: PathBuf,
    pub bytes_downloaded: u64,
    pub total_bytes: Option<u64>,
    pub error: Option<String>,
}

type SharedConnection = Arc<Mutex<Connection>>;

fn lock(conn: &SharedConnection) -> Result<MutexGuard<'_, Connection>, StoreError> {
    conn.lock().map_err(|_| StoreError::LockPoisoned)
}

/// Download facility that fetches artifacts directly over HTTP
pub struct LocalDownloadManager {
    conn: SharedConnection,
    client: reqwest::Client,
}

impl LocalDownloadManager {
    /// Opens the job database at `db_path`.
    ///
    /// Jobs left pending or running by a previous process are marked failed,
    /// since their transfer died with it.
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        Self::with_connection(db::open(db_path)?)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(db::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let interrupted = conn.execute(
            "UPDATE downloads SET state = ?1, error = ?2, updated_at = ?3 WHERE state IN (?4, ?5)",
            (
                DownloadState::Failed.as_str(),
                "interrupted",
                db::now_ms(),
                DownloadState::Pending.as_str(),
                DownloadState::Running.as_str(),
            ),
        )?;
        if interrupted > 0 {
            info!("Marked {} interrupted downloads as failed", interrupted);
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
        })
    }

    /// Current state of the job behind `handle`, if it exists
    pub fn status(&self, handle: DownloadJobHandle) -> Result<Option<DownloadStatus>, StoreError> {
        let conn = lock(&self.conn)?;
        let row = conn
            .query_row(
                r#"
                SELECT state, destination, bytes_downloaded, total_bytes, error
                FROM downloads WHERE id = ?1
                "#,
                [handle.id()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((state, destination, bytes_downloaded, total_bytes, error)) = row else {
            return Ok(None);
        };

        let Some(state) = DownloadState::parse(&state) else {
            warn!("Download {} has unknown state {:?}", handle, state);
            return Ok(None);
        };

        Ok(Some(DownloadStatus {
            state,
            destination: PathBuf::from(destination),
            bytes_downloaded: bytes_downloaded as u64,
            total_bytes: total_bytes.map(|t| t as u64),
            error,
        }))
    }
}

impl DownloadFacility for LocalDownloadManager {
    fn enqueue(&self, request: DownloadRequest) -> Result<DownloadJobHandle, DownloadError> {
        let url = Url::parse(&request.url)
            .map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", request.url, e)))?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| DownloadError::NoRuntime)?;

        let destination = request.destination_dir.join(&request.file_name);
        let now = db::now_ms();

        let handle = {
            let conn = lock(&self.conn)?;
            conn.execute(
                r#"
                INSERT INTO downloads
                    (url, title, description, destination, allow_metered, state, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                "#,
                (
                    &request.url,
                    &request.title,
                    &request.description,
                    destination.to_string_lossy().into_owned(),
                    request.allow_metered,
                    DownloadState::Pending.as_str(),
                    now,
                ),
            )
            .map_err(StoreError::from)?;
            DownloadJobHandle(conn.last_insert_rowid())
        };

        debug!(
            "Starting download {} ({}) to {:?}",
            handle, request.title, destination
        );

        let conn = self.conn.clone();
        let client = self.client.clone();
        runtime.spawn(async move {
            let result = run_transfer(&conn, &client, handle, url, &destination).await;
            finish_transfer(&conn, handle, &destination, result).await;
        });

        Ok(handle)
    }

    /// Blocks on a SQLite lookup and a `stat` of the destination file.
    /// Both are local and short, so async callers run it inline.
    fn resolve_uri(&self, handle: DownloadJobHandle) -> Result<Option<Url>, DownloadError> {
        let Some(status) = self.status(handle)? else {
            debug!("Unknown download {}", handle);
            return Ok(None);
        };

        if status.state != DownloadState::Successful {
            debug!("Download {} is {}", handle, status.state.as_str());
            return Ok(None);
        }

        if !status.destination.is_file() {
            warn!(
                "Download {} finished but {:?} is gone",
                handle, status.destination
            );
            return Ok(None);
        }

        let uri = std::path::absolute(&status.destination)
            .ok()
            .and_then(|path| Url::from_file_path(path).ok());
        if uri.is_none() {
            warn!(
                "Cannot build file URI for {:?}",
                status.destination
            );
        }
        Ok(uri)
    }
}

fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn update_job(
    conn: &SharedConnection,
    handle: DownloadJobHandle,
    state: DownloadState,
    bytes_downloaded: u64,
    total_bytes: Option<u64>,
    error: Option<&str>,
) -> Result<(), StoreError> {
    let conn = lock(conn)?;
    conn.execute(
        r#"
        UPDATE downloads
        SET state = ?1, bytes_downloaded = ?2, total_bytes = ?3, error = ?4, updated_at = ?5
        WHERE id = ?6
        "#,
        (
            state.as_str(),
            bytes_downloaded as i64,
            total_bytes.map(|t| t as i64),
            error,
            db::now_ms(),
            handle.id(),
        ),
    )?;
    Ok(())
}

async fn run_transfer(
    conn: &SharedConnection,
    client: &reqwest::Client,
    handle: DownloadJobHandle,
    url: Url,
    destination: &Path,
) -> Result<(u64, Option<u64>), DownloadError> {
    update_job(conn, handle, DownloadState::Running, 0, None, None)?;

    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status(status.as_u16()));
    }

    let total_bytes = response.content_length();
    let part = part_path(destination);
    let mut file = tokio::fs::File::create(&part).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let mut reported: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if downloaded - reported >= PROGRESS_INTERVAL_BYTES {
            update_job(conn, handle, DownloadState::Running, downloaded, total_bytes, None)?;
            reported = downloaded;
        }
    }

    file.flush().await?;
    drop(file);
    tokio::fs::rename(&part, destination).await?;

    Ok((downloaded, total_bytes))
}

async fn finish_transfer(
    conn: &SharedConnection,
    handle: DownloadJobHandle,
    destination: &Path,
    result: Result<(u64, Option<u64>), DownloadError>,
) {
    let recorded = match result {
        Ok((downloaded, total_bytes)) => {
            info!(
                "Download {} finished: {} bytes at {:?}",
                handle, downloaded, destination
            );
            update_job(
                conn,
                handle,
                DownloadState::Successful,
                downloaded,
                total_bytes.or(Some(downloaded)),
                None,
            )
        }
        Err(e) => {
            error!("Download {} failed: {}", handle, e);
            let _ = tokio::fs::remove_file(part_path(destination)).await;
            update_job(
                conn,
                handle,
                DownloadState::Failed,
                0,
                None,
                Some(&e.to_string()),
            )
        }
    };

    if let Err(e) = recorded {
        error!("Failed to record download {} result: {}", handle, e);
    }
}
