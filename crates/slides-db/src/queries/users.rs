//! User database queries.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use slides_common::{Error, Result, UserId};

use super::{timestamp_column, uuid_column};
use crate::models::User;

const USER_COLUMNS: &str = "id, username, is_admin, created_at";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId::from(uuid_column(0, &row.get::<_, String>(0)?)?),
        username: row.get(1)?,
        is_admin: row.get::<_, i32>(2)? != 0,
        created_at: timestamp_column(3, &row.get::<_, String>(3)?)?,
    })
}

/// Create a new user.
///
/// Fails with [`Error::InvalidInput`] when the username is already taken.
pub fn create_user(conn: &Connection, username: &str, is_admin: bool) -> Result<User> {
    let id = UserId::new();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO users (id, username, is_admin, created_at) VALUES (?, ?, ?, ?)",
        params![id.to_string(), username, is_admin as i32, now.to_rfc3339()],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::invalid_input(format!("Username already exists: {username}"))
        }
        _ => Error::database(e.to_string()),
    })?;

    Ok(User {
        id,
        username: username.to_string(),
        is_admin,
        created_at: now,
    })
}

/// Get a user by ID.
pub fn get_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
        [id.to_string()],
        row_to_user,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Get a user by username.
pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"),
        [username],
        row_to_user,
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}
