//! Bearer token authentication.
//!
//! Every API request is resolved to a [`Principal`] before it reaches a
//! handler. The principal is stored as a request extension.

use crate::server::{run_blocking, AppContext, AppError};
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeader,
};
use slides_common::{Error, Principal, Result};
use slides_db::pool::get_conn;
use slides_db::queries::auth_tokens;

/// Resolve the principal for a bearer token.
///
/// The configured admin API key maps to [`Principal::Administrator`]; a token
/// issued to a user maps to that user (or to the administrator when the user
/// is flagged as admin). Unknown tokens are rejected.
pub async fn resolve_principal(ctx: &AppContext, token: &str) -> Result<Principal> {
    if let Some(ref api_key) = ctx.config.auth.admin_api_key {
        if token == api_key {
            return Ok(Principal::Administrator);
        }
    }

    let pool = ctx.db.clone();
    let token = token.to_string();
    let user = run_blocking(move || {
        let conn = get_conn(&pool)?;
        auth_tokens::get_token_user(&conn, &token)
    })
    .await?;

    match user {
        Some(user) if user.is_admin => Ok(Principal::Administrator),
        Some(user) => Ok(Principal::User(user.id)),
        None => Err(Error::Unauthorized),
    }
}

/// Middleware attaching the request's [`Principal`].
///
/// Requests without credentials proceed as [`Principal::Guest`].
pub async fn auth_middleware(
    State(ctx): State<AppContext>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let principal = match bearer {
        Some(TypedHeader(auth)) => resolve_principal(&ctx, auth.token()).await?,
        None => Principal::Guest,
    };

    tracing::trace!(principal = %principal, "Resolved request principal");
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Generate a random API key
pub fn generate_api_key() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}
