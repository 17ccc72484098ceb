use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::update::error::StoreError;

/// Schema migrations
/// Each version contains a list of SQL statements to execute
const MIGRATIONS: &[&[&str]] = &[
    // v1: key-value table and download jobs
    &[
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS downloads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            destination TEXT NOT NULL,
            allow_metered INTEGER NOT NULL,
            state TEXT NOT NULL,
            bytes_downloaded INTEGER NOT NULL DEFAULT 0,
            total_bytes INTEGER,
            error TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_downloads_state ON downloads(state)",
    ],
];

/// Opens the database at `db_path`, creating it and applying migrations as needed
pub fn open(db_path: &Path) -> Result<Connection, StoreError> {
    info!("Opening updater database at {:?}", db_path);

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(db_path)?;

    // Enable WAL mode so the store and the download manager can share the file
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    apply_migrations(&conn)?;
    Ok(conn)
}

/// Opens a private in-memory database with the full schema
pub fn open_in_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    apply_migrations(&conn)?;
    Ok(conn)
}

/// Current timestamp in milliseconds since UNIX epoch
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Apply pending migrations based on user_version pragma
fn apply_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current_version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    for (i, statements) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            for sql in *statements {
                conn.execute(sql, [])?;
            }
            debug!("Applied migration v{}", version);
        }
    }

    let target_version = MIGRATIONS.len() as i32;
    if target_version > current_version {
        conn.pragma_update(None, "user_version", target_version)?;
        debug!("Updated schema version to v{}", target_version);
    }

    Ok(())
}
