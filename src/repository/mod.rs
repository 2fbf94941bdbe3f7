use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::models::Note;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "SELECT id, title, content, created_at, updated_at FROM notes";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to prepare database directory '{path}': {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// SQLite-backed storage for notes.
///
/// Holds only the database location; every operation opens its own connection,
/// runs inside a transaction and drops the connection before returning.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory of the database file if it is missing.
    pub fn prepare(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Ok(())
    }

    /// Creates the `notes` table when it does not exist yet. Safe to run on every startup.
    pub fn ensure_schema(&self) -> Result<(), StorageError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        tx.execute_batch(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );",
        )?;

        tx.commit()?;

        tracing::info!("Notes schema is ready at {}", self.path.display());

        Ok(())
    }

    /// Returns every note, most recently updated first; ties go to the higher id.
    pub fn select_all(&self) -> Result<Vec<Note>, StorageError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY updated_at DESC, id DESC"
        ))?;

        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn select_one(&self, id: i64) -> Result<Option<Note>, StorageError> {
        let conn = self.connect()?;

        let note = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                note_from_row,
            )
            .optional()?;

        Ok(note)
    }

    /// Inserts a note with both timestamps set to `now` and returns the assigned id.
    pub fn insert(
        &self,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let now = format_timestamp(now);

        tx.execute(
            "INSERT INTO notes (title, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![title, content, now, now],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;

        Ok(id)
    }

    /// Overwrites title and content and bumps `updated_at`.
    ///
    /// Affects zero rows when `id` does not exist; callers check existence first.
    pub fn update(
        &self,
        id: i64,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE notes SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
            params![title, content, format_timestamp(now), id],
        )?;

        tx.commit()?;

        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<(), StorageError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM notes WHERE id = ?1", params![id])?;

        tx.commit()?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Ok(conn)
    }
}

/// Formats a timestamp the way it is stored: `2024-01-31T08:15:00Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: parse_timestamp(row, 3)?,
        updated_at: parse_timestamp(row, 4)?,
    })
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;

    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
