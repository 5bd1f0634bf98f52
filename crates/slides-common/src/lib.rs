//! Slides-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across slides:
//!
//! - **Typed IDs**: Type-safe UUID wrappers for users and file attachments
//! - **Principal**: Who is making a request (administrator, user, or guest)
//! - **Path Utilities**: Public alias remapping, traversal guards, MIME guessing
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use slides_common::{FileId, Principal, Error, Result};
//! use slides_common::paths::guess_mime;
//! use std::path::Path;
//!
//! let file_id = FileId::new();
//! let guest = Principal::Guest;
//! assert!(!guest.is_authenticated());
//!
//! assert_eq!(guess_mime(Path::new("intro.webm")), "video/webm");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("file"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
