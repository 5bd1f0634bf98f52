use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slides")]
#[command(author, version, about = "Media server for slideshow attachments")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the media server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Register an existing file under the site root as an attachment
    Register {
        /// Attachment URL, e.g. /files/intro.mp4 or /private/files/intro.mp4
        src: String,

        /// Mark the attachment private (requires a /private/files/ URL)
        #[arg(long)]
        private: bool,

        /// Username of the owning user
        #[arg(long)]
        owner: Option<String>,

        /// Presentation the file belongs to
        #[arg(long)]
        attached_to: Option<String>,
    },

    /// Remove an attachment record and its file
    Remove {
        /// Attachment URL; public URLs also match their private counterpart
        src: String,
    },

    /// Create a user and print a bearer token for it
    CreateUser {
        username: String,

        /// Grant administrator access
        #[arg(long)]
        admin: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Generate a random API key for programmatic access
    GenerateApiKey,

    /// Display version information
    Version,
}
