//! Existence and permission checks run before any media bytes are read.

use slides_common::{Error, Principal, Result};
use slides_db::models::FileRecord;
use slides_db::pool::{get_conn, DbPool};
use slides_db::queries::files;

/// Lookup of attachment metadata records.
pub trait DocumentStore: Send + Sync {
    /// Find the record registered for `file_url`.
    fn find_file_by_url(&self, file_url: &str) -> Result<Option<FileRecord>>;
}

/// Read permission on attachment records.
pub trait PermissionCheck: Send + Sync {
    fn can_read(&self, file: &FileRecord, principal: &Principal) -> bool;
}

/// [`DocumentStore`] backed by the SQLite pool.
#[derive(Clone)]
pub struct DbDocumentStore {
    pool: DbPool,
}

impl DbDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl DocumentStore for DbDocumentStore {
    fn find_file_by_url(&self, file_url: &str) -> Result<Option<FileRecord>> {
        let conn = get_conn(&self.pool)?;
        files::get_file_by_url(&conn, file_url)
    }
}

/// Public files are readable by everyone, guests included. Private files are
/// readable by their owner and by administrators.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerPermission;

impl PermissionCheck for OwnerPermission {
    fn can_read(&self, file: &FileRecord, principal: &Principal) -> bool {
        if !file.is_private {
            return true;
        }
        match principal {
            Principal::Administrator => true,
            Principal::User(id) => file.owner_id == Some(*id),
            Principal::Guest => false,
        }
    }
}

/// Whether `principal` may modify or delete `file`.
pub fn can_write(file: &FileRecord, principal: &Principal) -> bool {
    match principal {
        Principal::Administrator => true,
        Principal::User(id) => file.owner_id == Some(*id),
        Principal::Guest => false,
    }
}

/// Confirm a record exists for `src` and that `principal` may read it.
pub fn authorize(
    store: &dyn DocumentStore,
    permissions: &dyn PermissionCheck,
    src: &str,
    principal: &Principal,
) -> Result<FileRecord> {
    let file = store
        .find_file_by_url(src)?
        .ok_or_else(|| Error::not_found(src))?;

    if !permissions.can_read(&file, principal) {
        return Err(Error::Forbidden);
    }

    Ok(file)
}
