//! Attachment record query operations.
//!
//! A file record ties an attachment URL (`/files/...` or `/private/files/...`)
//! to its privacy flag, owner, and the presentation it is attached to.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use slides_common::{Error, FileId, Result, UserId};

use super::{timestamp_column, uuid_column};
use crate::models::FileRecord;

const FILE_COLUMNS: &str = "id, file_url, file_name, is_private, owner_id, attached_to, created_at";

fn row_to_file(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    let owner_id = row
        .get::<_, Option<String>>(4)?
        .map(|s| uuid_column(4, &s).map(UserId::from))
        .transpose()?;

    Ok(FileRecord {
        id: FileId::from(uuid_column(0, &row.get::<_, String>(0)?)?),
        file_url: row.get(1)?,
        file_name: row.get(2)?,
        is_private: row.get::<_, i32>(3)? != 0,
        owner_id,
        attached_to: row.get(5)?,
        created_at: timestamp_column(6, &row.get::<_, String>(6)?)?,
    })
}

/// Register a new attachment record.
///
/// Fails with [`Error::InvalidInput`] if a record for `file_url` already exists.
pub fn create_file(
    conn: &Connection,
    file_url: &str,
    file_name: &str,
    is_private: bool,
    owner_id: Option<UserId>,
    attached_to: Option<&str>,
) -> Result<FileRecord> {
    let id = FileId::new();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO files (id, file_url, file_name, is_private, owner_id, attached_to, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            id.to_string(),
            file_url,
            file_name,
            is_private as i32,
            owner_id.map(|u| u.to_string()),
            attached_to,
            now.to_rfc3339(),
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::invalid_input(format!("File already registered: {file_url}"))
        }
        _ => Error::database(e.to_string()),
    })?;

    Ok(FileRecord {
        id,
        file_url: file_url.to_string(),
        file_name: file_name.to_string(),
        is_private,
        owner_id,
        attached_to: attached_to.map(String::from),
        created_at: now,
    })
}

/// Get a file record by ID.
pub fn get_file(conn: &Connection, id: FileId) -> Result<FileRecord> {
    conn.query_row(
        &format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ?"),
        [id.to_string()],
        row_to_file,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Error::not_found(format!("file {id}")),
        _ => Error::database(e.to_string()),
    })
}

/// Find the record registered for an attachment URL.
pub fn get_file_by_url(conn: &Connection, file_url: &str) -> Result<Option<FileRecord>> {
    conn.query_row(
        &format!("SELECT {FILE_COLUMNS} FROM files WHERE file_url = ?"),
        [file_url],
        row_to_file,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// List records attached to a presentation, oldest first.
pub fn list_files_attached_to(conn: &Connection, attached_to: &str) -> Result<Vec<FileRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE attached_to = ? ORDER BY created_at, file_url"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let files = stmt
        .query_map([attached_to], row_to_file)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(files)
}

/// Delete a file record. Returns whether a record was removed.
pub fn delete_file(conn: &Connection, id: FileId) -> Result<bool> {
    let rows = conn
        .execute("DELETE FROM files WHERE id = ?", [id.to_string()])
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows > 0)
}
