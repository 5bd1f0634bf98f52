//! Attachment cleanup.
//!
//! Removing an attachment deletes its record first; the backing file is then
//! removed on a best-effort basis. Storage failures are logged and never
//! surfaced to the caller.

use rusqlite::Connection;
use slides_common::paths::{private_alias, storage_path};
use slides_common::Result;
use slides_db::models::FileRecord;
use slides_db::queries::files;
use std::path::Path;

use super::fs::FileSystem;

/// Find the record for `file_url`, falling back to its private alias.
///
/// Attachment URLs embedded in presentations are stored in their public form
/// (`/files/x`) even when the record itself was registered privately
/// (`/private/files/x`).
pub fn find_attachment(conn: &Connection, file_url: &str) -> Result<Option<FileRecord>> {
    if let Some(file) = files::get_file_by_url(conn, file_url)? {
        return Ok(Some(file));
    }

    match private_alias(file_url) {
        Some(alias) => files::get_file_by_url(conn, &alias),
        None => Ok(None),
    }
}

/// Delete `file`'s record and then its backing file.
///
/// Returns whether a record was deleted.
pub fn remove_attachment(
    conn: &Connection,
    fs: &dyn FileSystem,
    site_root: &Path,
    file: &FileRecord,
) -> Result<bool> {
    if !files::delete_file(conn, file.id)? {
        return Ok(false);
    }

    match storage_path(site_root, &file.file_url) {
        Ok(path) => {
            if let Err(e) = fs.remove(&path) {
                tracing::warn!(
                    file_url = %file.file_url,
                    path = %path.display(),
                    "Failed to remove attachment file: {}",
                    e
                );
            }
        }
        Err(e) => {
            tracing::warn!(file_url = %file.file_url, "Attachment URL has no storage path: {}", e);
        }
    }

    tracing::info!(file_url = %file.file_url, id = %file.id, "Removed attachment");
    Ok(true)
}
