//! Database query modules.
//!
//! - users: User accounts
//! - auth_tokens: Bearer token management
//! - files: Attachment metadata records

pub mod auth_tokens;
pub mod files;
pub mod users;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use uuid::Uuid;

/// Parse a UUID column, surfacing bad data as a conversion error.
pub(crate) fn uuid_column(idx: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse an RFC 3339 timestamp column.
pub(crate) fn timestamp_column(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
