//! Rust models matching the database schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slides_common::{FileId, UserId};

/// User account model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Bearer token issued to a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthToken {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Attachment metadata record.
///
/// The record is what access checks run against; the bytes themselves live
/// on disk at the location `file_url` maps to under the site root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    pub id: FileId,
    pub file_url: String,
    pub file_name: String,
    pub is_private: bool,
    pub owner_id: Option<UserId>,
    /// Name of the presentation the file is attached to, if any.
    pub attached_to: Option<String>,
    pub created_at: DateTime<Utc>,
}
