//! Slides - Media server for slideshow attachments
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod media;
pub mod server;
