//! Media serving for presentation attachments.
//!
//! Videos and images embedded in slides are fetched through
//! `GET /api/media?src=<url>`. Browsers seek inside videos with `Range`
//! requests, so responses honor a single byte range.
//!
//! Every request runs in three steps, and nothing is read from storage until
//! the first one passes:
//!
//! 1. [`access::authorize`] - the attachment record must exist and be readable
//! 2. [`responder::resolve`] - map the URL onto disk and stat the file
//! 3. [`responder::build_response`] - read the full file or the requested range

pub mod access;
pub mod fs;
pub mod housekeeping;
pub mod range;
pub mod responder;

pub use access::{DbDocumentStore, DocumentStore, OwnerPermission, PermissionCheck};
pub use fs::{FileSystem, LocalFileSystem};
pub use range::{parse_range, ByteRange, RangeSpec};
pub use responder::{build_response, resolve, MediaResource, MediaResponse};

use slides_common::{Principal, Result};
use std::path::Path;

/// Everything a single media request needs, passed explicitly.
pub struct MediaRequest<'a> {
    pub principal: Principal,
    /// Raw `Range` header value, if the client sent one.
    pub range: Option<&'a str>,
    pub site_root: &'a Path,
    pub store: &'a dyn DocumentStore,
    pub permissions: &'a dyn PermissionCheck,
    pub fs: &'a dyn FileSystem,
}

/// Serve the attachment at `src`.
///
/// Blocks on storage I/O.
pub fn serve_media(req: &MediaRequest<'_>, src: &str) -> Result<MediaResponse> {
    access::authorize(req.store, req.permissions, src, &req.principal)?;

    let resource = resolve(req.fs, req.site_root, src)?;
    build_response(req.fs, &resource, req.range)
}
