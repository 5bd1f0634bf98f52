//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temporary site
//! root, and a full [`AppContext`] whose storage is wrapped in a
//! [`CountingFileSystem`] so tests can assert how often storage was touched.

#![allow(dead_code)]

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use slides::config::Config;
use slides::media::{FileSystem, LocalFileSystem};
use slides::server::{create_router, AppContext};
use slides_common::paths::{is_private_url, storage_path};
use slides_common::UserId;
use slides_db::models::{FileRecord, User};
use slides_db::pool::{init_memory_pool, DbPool, PooledConnection};
use slides_db::queries::{auth_tokens, files, users};

pub const ADMIN_KEY: &str = "test-admin-key";

/// [`LocalFileSystem`] that counts every operation.
#[derive(Default)]
pub struct CountingFileSystem {
    inner: LocalFileSystem,
    sizes: AtomicUsize,
    reads: AtomicUsize,
}

impl CountingFileSystem {
    /// Number of read operations (ranged or full).
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of storage operations of any kind.
    pub fn operations(&self) -> usize {
        self.sizes.load(Ordering::SeqCst) + self.reads()
    }
}

impl FileSystem for CountingFileSystem {
    fn size(&self, path: &Path) -> io::Result<u64> {
        self.sizes.fetch_add(1, Ordering::SeqCst);
        self.inner.size(path)
    }

    fn read_range(&self, path: &Path, start: u64, length: u64) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_range(path, start, length)
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_all(path)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.inner.remove(path)
    }
}

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub site: tempfile::TempDir,
    pub fs: Arc<CountingFileSystem>,
}

impl TestHarness {
    pub fn new() -> Self {
        let site = tempfile::tempdir().expect("failed to create site root");
        let db = init_memory_pool().expect("failed to create in-memory pool");

        let mut config = Config::default();
        config.storage.site_root = site.path().to_path_buf();
        config.auth.admin_api_key = Some(ADMIN_KEY.to_string());

        let fs = Arc::new(CountingFileSystem::default());
        let ctx = AppContext::new(config, db.clone()).with_file_system(fs.clone());

        Self { ctx, db, site, fs }
    }

    pub fn app(&self) -> Router {
        create_router(self.ctx.clone())
    }

    /// Get a database connection from the pool.
    ///
    /// The in-memory pool holds a single connection; drop it before sending
    /// requests.
    pub fn conn(&self) -> PooledConnection {
        slides_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// Write `data` at the storage location of `url` without registering it.
    pub fn write_file(&self, url: &str, data: &[u8]) {
        let path = storage_path(self.site.path(), url).expect("invalid attachment url");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }

    /// Write `data` at `url` and register a record for it.
    pub fn add_file(&self, url: &str, data: &[u8], owner: Option<UserId>) -> FileRecord {
        self.write_file(url, data);
        self.add_record(url, owner)
    }

    /// Register a record for `url` without writing anything to storage.
    pub fn add_record(&self, url: &str, owner: Option<UserId>) -> FileRecord {
        let conn = self.conn();
        let name = url.rsplit('/').next().unwrap();
        files::create_file(&conn, url, name, is_private_url(url), owner, Some("Deck-1")).unwrap()
    }

    /// Create a user and return it together with a bearer token.
    pub fn add_user(&self, username: &str, is_admin: bool) -> (User, String) {
        let conn = self.conn();
        let user = users::create_user(&conn, username, is_admin).unwrap();
        let token = auth_tokens::create_token(&conn, user.id).unwrap();
        (user, token.token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app().oneshot(request).await.unwrap()
    }

    /// GET the media endpoint for `src`.
    pub async fn get_media(
        &self,
        src: &str,
        token: Option<&str>,
        range: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(format!("/api/media?src={}", encode(src)));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(range) = range {
            builder = builder.header(header::RANGE, range);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}

/// Percent-encode the few characters attachment URLs in tests contain.
pub fn encode(src: &str) -> String {
    src.replace('%', "%25")
        .replace('/', "%2F")
        .replace(' ', "%20")
        .replace('&', "%26")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Deterministic, non-repeating-looking content of `len` bytes.
pub fn sample_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31 + 7) % 251) as u8).collect()
}
