//! Local result store for completed test runs
//!
//! Records live in a single SQLite file under the data directory:
//! - Linux: ~/.local/share/quickbench/
//! - macOS: ~/Library/Application Support/quickbench/
//! - Windows: %APPDATA%/quickbench/
//!
//! The store is append-only. There is no update, delete or per-kind query;
//! `list_all` is the only read path.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::benchmark::TestKind;

/// Persisted timestamp layout, second granularity.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATABASE_FILE: &str = "quickbench.db";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: i64, reason: String },
}

/// Row id of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: RecordId,
    pub kind: TestKind,
    pub score: i64,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

impl TestRecord {
    /// One line of the History dialog.
    pub fn history_line(&self) -> String {
        format!(
            "{} | Result: {} | Time: {}",
            self.kind,
            self.score,
            self.timestamp.format(TIMESTAMP_FORMAT)
        )
    }
}

/// Append-only SQLite record store
pub struct ResultStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl ResultStore {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;",
        )?;
        migrate(&conn)?;

        info!(path = %path.display(), "Opened result store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        migrate(&conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert a record stamped with the current local time.
    pub fn append(&self, kind: TestKind, score: i64) -> Result<RecordId, StoreError> {
        self.append_at(kind, score, Local::now().naive_local())
    }

    pub(crate) fn append_at(
        &self,
        kind: TestKind,
        score: i64,
        at: NaiveDateTime,
    ) -> Result<RecordId, StoreError> {
        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        self.conn.execute(
            "INSERT INTO test_results (test_type, result, timestamp) VALUES (?1, ?2, ?3)",
            params![kind.as_str(), score, timestamp],
        )?;
        let id = RecordId(self.conn.last_insert_rowid());
        debug!(%id, %kind, score, %timestamp, "Appended test record");
        Ok(id)
    }

    /// All records, most recent first.
    pub fn list_all(&self) -> Result<Vec<TestRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, test_type, result, timestamp FROM test_results
             ORDER BY timestamp DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, kind, score, timestamp) = row?;
            let kind = kind.parse::<TestKind>().map_err(|e| StoreError::CorruptRecord {
                id,
                reason: e.to_string(),
            })?;
            let timestamp = NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).map_err(
                |e| StoreError::CorruptRecord {
                    id,
                    reason: format!("bad timestamp '{timestamp}': {e}"),
                },
            )?;
            records.push(TestRecord {
                id: RecordId(id),
                kind,
                score,
                timestamp,
            });
        }
        Ok(records)
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error from the final flush.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, err)| StoreError::from(err))
    }
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS test_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            test_type TEXT NOT NULL,
            result INTEGER NOT NULL,
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_test_results_timestamp
            ON test_results(timestamp);",
    )?;
    Ok(())
}

/// Default data directory for the store and log file.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "quickbench", "quickbench")
        .context("Could not determine project directories")?;
    Ok(dirs.data_dir().to_path_buf())
}

pub fn default_database_path() -> anyhow::Result<PathBuf> {
    Ok(default_data_dir()?.join(DATABASE_FILE))
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
