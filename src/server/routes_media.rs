use crate::media::{serve_media, MediaRequest, MediaResponse};
use crate::server::{run_blocking, AppContext, AppError};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use slides_common::{Error, Principal};

pub fn media_routes() -> Router<AppContext> {
    Router::new()
        .route("/method/slides.api.file.get_media_file", get(get_media_file))
        .route("/media", get(get_media_file))
}

#[derive(Deserialize)]
struct MediaQuery {
    src: Option<String>,
}

async fn get_media_file(
    State(ctx): State<AppContext>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<MediaQuery>,
    headers: HeaderMap,
) -> Result<MediaResponse, AppError> {
    let src = query
        .src
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::invalid_input("missing src parameter"))?;

    // A header that is not valid UTF-8 still counts as present; the lenient
    // parser turns it into a full-resource range. A blank one does not.
    let range = headers
        .get(header::RANGE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .filter(|v| !v.trim().is_empty());

    tracing::debug!(src = %src, range = ?range, principal = %principal, "Media request");

    let response = run_blocking(move || {
        let req = MediaRequest {
            principal,
            range: range.as_deref(),
            site_root: &ctx.config.storage.site_root,
            store: ctx.store.as_ref(),
            permissions: ctx.permissions.as_ref(),
            fs: ctx.fs.as_ref(),
        };
        serve_media(&req, &src)
    })
    .await?;

    tracing::debug!(
        status = %response.status,
        length = response.content_length(),
        content_range = ?response.content_range,
        "Media response"
    );

    Ok(response)
}
