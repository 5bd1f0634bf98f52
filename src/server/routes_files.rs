//! Attachment record management.

use crate::media::{access, housekeeping};
use crate::server::{run_blocking, AppContext, AppError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Deserialize;
use slides_common::paths::{is_private_url, storage_path};
use slides_common::{Error, FileId, Principal};
use slides_db::models::FileRecord;
use slides_db::pool::get_conn;
use slides_db::queries::files;

pub fn file_routes() -> Router<AppContext> {
    Router::new()
        .route("/files", get(list_files).post(create_file))
        .route("/files/:id", delete(delete_file))
}

#[derive(Deserialize)]
struct ListFilesQuery {
    attached_to: Option<String>,
}

/// Files attached to a presentation that the caller may read.
async fn list_files(
    State(ctx): State<AppContext>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<FileRecord>>, AppError> {
    let attached_to = query
        .attached_to
        .ok_or_else(|| Error::invalid_input("missing attached_to parameter"))?;

    let records = run_blocking(move || {
        let conn = get_conn(&ctx.db)?;
        let records = files::list_files_attached_to(&conn, &attached_to)?;
        Ok(records
            .into_iter()
            .filter(|f| ctx.permissions.can_read(f, &principal))
            .collect())
    })
    .await?;

    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub file_url: String,
    /// Defaults to the last segment of `file_url`.
    pub file_name: Option<String>,
    /// Defaults to whether `file_url` is under `/private/files/`.
    pub is_private: Option<bool>,
    pub attached_to: Option<String>,
}

async fn create_file(
    State(ctx): State<AppContext>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateFileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !principal.is_authenticated() {
        return Err(Error::Unauthorized.into());
    }

    // Rejects URLs outside the two storage prefixes and traversal attempts.
    storage_path(&ctx.config.storage.site_root, &req.file_url)?;

    let url_is_private = is_private_url(&req.file_url);
    let is_private = req.is_private.unwrap_or(url_is_private);
    if is_private != url_is_private {
        return Err(Error::invalid_input(format!(
            "is_private={} does not match file_url {}",
            is_private, req.file_url
        ))
        .into());
    }

    let file_name = match req.file_name {
        Some(name) => name,
        None => req
            .file_url
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let record = run_blocking(move || {
        let conn = get_conn(&ctx.db)?;
        files::create_file(
            &conn,
            &req.file_url,
            &file_name,
            is_private,
            principal.user_id(),
            req.attached_to.as_deref(),
        )
    })
    .await?;

    tracing::info!(file_url = %record.file_url, principal = %principal, "Registered attachment");

    Ok((StatusCode::CREATED, Json(record)))
}

async fn delete_file(
    State(ctx): State<AppContext>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !principal.is_authenticated() {
        return Err(Error::Unauthorized.into());
    }

    let id: FileId = id
        .parse()
        .map_err(|_| Error::invalid_input(format!("invalid file id: {}", id)))?;

    run_blocking(move || {
        let conn = get_conn(&ctx.db)?;
        let file = files::get_file(&conn, id)?;
        if !access::can_write(&file, &principal) {
            return Err(Error::Forbidden);
        }
        housekeeping::remove_attachment(
            &conn,
            ctx.fs.as_ref(),
            &ctx.config.storage.site_root,
            &file,
        )
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
