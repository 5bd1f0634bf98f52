use crate::config::Config;
use crate::media::{
    DbDocumentStore, DocumentStore, FileSystem, LocalFileSystem, OwnerPermission, PermissionCheck,
};
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use slides_common::Error;
use slides_db::pool::DbPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod error;
pub mod routes_files;
pub mod routes_media;

pub use error::AppError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Database connection pool
    pub db: DbPool,
    /// Attachment record lookup used by the media gate
    pub store: Arc<dyn DocumentStore>,
    pub permissions: Arc<dyn PermissionCheck>,
    /// Backing storage for attachment bytes
    pub fs: Arc<dyn FileSystem>,
}

impl AppContext {
    /// Context backed by the database pool and the local disk.
    pub fn new(config: Config, db: DbPool) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(DbDocumentStore::new(db.clone())),
            permissions: Arc::new(OwnerPermission),
            fs: Arc::new(LocalFileSystem),
            db,
        }
    }

    /// Replace the storage backend.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }
}

/// Run blocking storage or database work off the async runtime.
pub(crate) async fn run_blocking<T, F>(f: F) -> slides_common::Result<T>
where
    F: FnOnce() -> slides_common::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::internal(format!("spawn_blocking join error: {e}")))?
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::RANGE])
        .expose_headers([
            header::CONTENT_RANGE,
            header::ACCEPT_RANGES,
            header::CONTENT_LENGTH,
        ]);

    let api = routes_media::media_routes()
        .merge(routes_files::file_routes())
        .layer(middleware::from_fn_with_state(
            ctx.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config, db: DbPool) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    tracing::info!("Serving attachments from {:?}", config.storage.site_root);

    let app = create_router(AppContext::new(config, db));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
