//! Range-aware media responses.
//!
//! Turns an attachment URL plus an optional `Range` header into a fully
//! buffered response: `200 OK` with the whole file, or `206 Partial Content`
//! with exactly the requested bytes.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use slides_common::paths::{guess_mime, storage_path};
use slides_common::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};

use super::fs::FileSystem;
use super::range::RangeSpec;

/// A media file located on disk and sized for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResource {
    pub path: PathBuf,
    pub size: u64,
    pub mime_type: &'static str,
}

/// A buffered media response.
#[derive(Debug, Clone)]
pub struct MediaResponse {
    pub status: StatusCode,
    pub mime_type: &'static str,
    pub content_range: Option<String>,
    pub body: Bytes,
}

impl MediaResponse {
    /// Value of the `Content-Length` header; always the body length.
    pub fn content_length(&self) -> u64 {
        self.body.len() as u64
    }
}

impl IntoResponse for MediaResponse {
    fn into_response(self) -> Response {
        let mut builder = Response::builder()
            .status(self.status)
            .header(header::CONTENT_TYPE, self.mime_type)
            .header(header::CONTENT_LENGTH, self.content_length().to_string())
            .header(header::ACCEPT_RANGES, "bytes");

        if let Some(content_range) = self.content_range {
            builder = builder.header(header::CONTENT_RANGE, content_range);
        }

        builder
            .body(Body::from(self.body))
            .unwrap_or_else(|e| {
                tracing::error!("Failed to assemble media response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })
    }
}

/// Locate the file behind an attachment URL and stat it.
///
/// Public URLs (`/files/...`) are remapped to the site's `public/` storage
/// prefix. Fails with [`Error::NotFound`] when no regular file exists there.
pub fn resolve(fs: &dyn FileSystem, site_root: &Path, src: &str) -> Result<MediaResource> {
    let path = storage_path(site_root, src)?;

    let size = fs.size(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::not_found(src),
        _ => Error::Io(e),
    })?;

    let mime_type = guess_mime(&path);

    Ok(MediaResource {
        path,
        size,
        mime_type,
    })
}

/// Build the response for `resource`, honoring `range_header` if present.
///
/// Without a header the whole file is returned with `200`; an empty or
/// blank header counts as no header. Otherwise the header is parsed
/// leniently and resolved against the resource size, and the resolved bytes
/// are returned with `206` and a `Content-Range`.
pub fn build_response(
    fs: &dyn FileSystem,
    resource: &MediaResource,
    range_header: Option<&str>,
) -> Result<MediaResponse> {
    let range_header = range_header.filter(|h| !h.trim().is_empty());
    let Some(range_header) = range_header else {
        let data = fs.read_all(&resource.path)?;
        if data.len() as u64 != resource.size {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "{} changed size while being served",
                    resource.path.display()
                ),
            )));
        }

        return Ok(MediaResponse {
            status: StatusCode::OK,
            mime_type: resource.mime_type,
            content_range: None,
            body: Bytes::from(data),
        });
    };

    let range = RangeSpec::parse(range_header).resolve(resource.size)?;
    let data = fs.read_range(&resource.path, range.start, range.length())?;

    Ok(MediaResponse {
        status: StatusCode::PARTIAL_CONTENT,
        mime_type: resource.mime_type,
        content_range: Some(range.content_range(resource.size)),
        body: Bytes::from(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::media::fs::LocalFileSystem;

    struct Site {
        dir: tempfile::TempDir,
        data: Vec<u8>,
    }

    fn site_with_clip() -> Site {
        let dir = tempfile::tempdir().unwrap();
        let files = dir.path().join("public/files");
        std::fs::create_dir_all(&files).unwrap();
        let data: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(files.join("clip.mp4"), &data).unwrap();
        Site { dir, data }
    }

    #[test]
    fn test_resolve_public_alias() {
        let site = site_with_clip();
        let resource = resolve(&LocalFileSystem, site.dir.path(), "/files/clip.mp4").unwrap();
        assert_eq!(resource.size, 1000);
        assert_eq!(resource.mime_type, "video/mp4");
        assert_eq!(
            resource.path,
            site.dir.path().join("public/files/clip.mp4")
        );
    }

    #[test]
    fn test_resolve_missing_file() {
        let site = site_with_clip();
        let err = resolve(&LocalFileSystem, site.dir.path(), "/files/nope.mp4").unwrap_err();
        assert_matches!(err, Error::NotFound(_));

        // Exists publicly, but not under private storage
        let err =
            resolve(&LocalFileSystem, site.dir.path(), "/private/files/clip.mp4").unwrap_err();
        assert_matches!(err, Error::NotFound(_));
    }

    #[test]
    fn test_full_response() {
        let site = site_with_clip();
        let resource = resolve(&LocalFileSystem, site.dir.path(), "/files/clip.mp4").unwrap();
        let response = build_response(&LocalFileSystem, &resource, None).unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_length(), 1000);
        assert!(response.content_range.is_none());
        assert_eq!(&response.body[..], &site.data[..]);
    }

    #[test]
    fn test_partial_response() {
        let site = site_with_clip();
        let resource = resolve(&LocalFileSystem, site.dir.path(), "/files/clip.mp4").unwrap();
        let response =
            build_response(&LocalFileSystem, &resource, Some("bytes=100-199")).unwrap();

        assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.content_length(), 100);
        assert_eq!(
            response.content_range.as_deref(),
            Some("bytes 100-199/1000")
        );
        assert_eq!(&response.body[..], &site.data[100..200]);
    }

    #[test]
    fn test_blank_range_header_is_full_response() {
        let site = site_with_clip();
        let resource = resolve(&LocalFileSystem, site.dir.path(), "/files/clip.mp4").unwrap();

        for header in ["", "   "] {
            let response = build_response(&LocalFileSystem, &resource, Some(header)).unwrap();
            assert_eq!(response.status, StatusCode::OK, "{header:?}");
            assert!(response.content_range.is_none());
            assert_eq!(response.content_length(), 1000);
        }
    }

    #[test]
    fn test_unsatisfiable_range() {
        let site = site_with_clip();
        let resource = resolve(&LocalFileSystem, site.dir.path(), "/files/clip.mp4").unwrap();
        let err = build_response(&LocalFileSystem, &resource, Some("bytes=5000-")).unwrap_err();
        assert_matches!(err, Error::RangeNotSatisfiable { size: 1000 });
    }

    #[test]
    fn test_into_response_headers() {
        let response = MediaResponse {
            status: StatusCode::PARTIAL_CONTENT,
            mime_type: "video/webm",
            content_range: Some("bytes 0-3/10".into()),
            body: Bytes::from_static(b"abcd"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "video/webm");
        assert_eq!(headers[header::CONTENT_LENGTH], "4");
        assert_eq!(headers[header::ACCEPT_RANGES], "bytes");
        assert_eq!(headers[header::CONTENT_RANGE], "bytes 0-3/10");
    }
}
