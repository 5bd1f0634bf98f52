//! Authentication token database queries.
//!
//! Tokens are opaque random strings handed to API clients and sent back as
//! `Authorization: Bearer <token>`.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use slides_common::{Error, Result, UserId};
use uuid::Uuid;

use super::{timestamp_column, uuid_column};
use crate::models::{AuthToken, User};

/// Create a new authentication token for a user.
pub fn create_token(conn: &Connection, user_id: UserId) -> Result<AuthToken> {
    let token = Uuid::new_v4().simple().to_string();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO auth_tokens (token, user_id, created_at)
         VALUES (:token, :user_id, :created_at)",
        rusqlite::named_params! {
            ":token": token,
            ":user_id": user_id.to_string(),
            ":created_at": now.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(AuthToken {
        token,
        user_id,
        created_at: now,
    })
}

/// Look up the user a token belongs to.
///
/// Returns `Ok(None)` if the token does not exist.
pub fn get_token_user(conn: &Connection, token: &str) -> Result<Option<User>> {
    conn.query_row(
        "SELECT u.id, u.username, u.is_admin, u.created_at
         FROM auth_tokens t
         INNER JOIN users u ON t.user_id = u.id
         WHERE t.token = :token",
        rusqlite::named_params! { ":token": token },
        |row| {
            Ok(User {
                id: UserId::from(uuid_column(0, &row.get::<_, String>(0)?)?),
                username: row.get(1)?,
                is_admin: row.get::<_, i32>(2)? != 0,
                created_at: timestamp_column(3, &row.get::<_, String>(3)?)?,
            })
        },
    )
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Delete a token. Returns whether a token was removed.
pub fn delete_token(conn: &Connection, token: &str) -> Result<bool> {
    let rows = conn
        .execute(
            "DELETE FROM auth_tokens WHERE token = :token",
            rusqlite::named_params! { ":token": token },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows > 0)
}
