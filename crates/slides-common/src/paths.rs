//! Path utilities for mapping attachment URLs onto site storage.
//!
//! Attachment URLs come in two shapes: `/files/<name>` for public files and
//! `/private/files/<name>` for private ones. Public URLs are an alias for the
//! `public/` storage prefix under the site root.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// URL prefix of public attachments.
pub const PUBLIC_PREFIX: &str = "/files/";

/// URL prefix of private attachments.
pub const PRIVATE_PREFIX: &str = "/private/files/";

/// MIME type reported when the extension is unknown.
pub const DEFAULT_MIME: &str = "video/mp4";

/// Resolve an attachment URL to its location on disk.
///
/// `/files/a.mp4` maps to `<site_root>/public/files/a.mp4` and
/// `/private/files/a.mp4` maps to `<site_root>/private/files/a.mp4`.
/// Anything else, and any URL containing `..`, `.` or empty segments,
/// backslashes or NUL bytes, is rejected before the filesystem is touched.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use slides_common::paths::storage_path;
///
/// let path = storage_path(Path::new("/srv/site"), "/files/intro.mp4").unwrap();
/// assert_eq!(path, Path::new("/srv/site/public/files/intro.mp4"));
///
/// assert!(storage_path(Path::new("/srv/site"), "/files/../secret").is_err());
/// ```
pub fn storage_path(site_root: &Path, src: &str) -> Result<PathBuf> {
    if src.contains('\\') || src.contains('\0') {
        return Err(Error::invalid_input(format!("Invalid attachment URL: {src}")));
    }

    let (storage_prefix, rest) = if let Some(rest) = src.strip_prefix(PUBLIC_PREFIX) {
        ("public/files", rest)
    } else if let Some(rest) = src.strip_prefix(PRIVATE_PREFIX) {
        ("private/files", rest)
    } else {
        return Err(Error::invalid_input(format!(
            "Attachment URL must start with {PUBLIC_PREFIX} or {PRIVATE_PREFIX}: {src}"
        )));
    };

    let mut path = site_root.join(storage_prefix);
    for segment in rest.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(Error::invalid_input(format!("Invalid attachment URL: {src}")));
        }
        path.push(segment);
    }

    Ok(path)
}

/// Guess the MIME type of a file from its extension.
///
/// Falls back to `video/mp4` because most attachments served with range
/// requests are embedded slide videos.
pub fn guess_mime(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_MIME)
}

/// Private-storage URL for a public attachment URL.
///
/// Thumbnails are stored privately but referenced through their public
/// alias; housekeeping needs the private form to find the record.
pub fn private_alias(url: &str) -> Option<String> {
    url.starts_with(PUBLIC_PREFIX)
        .then(|| format!("/private{url}"))
}

/// Whether the URL points at private storage.
pub fn is_private_url(url: &str) -> bool {
    url.starts_with(PRIVATE_PREFIX)
}
