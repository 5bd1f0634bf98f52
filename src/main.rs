mod cli;

use slides::{
    config::{self, Config},
    media::{housekeeping, FileSystem, LocalFileSystem},
    server::{self, auth},
};
use slides_common::paths::{is_private_url, storage_path};
use slides_db::pool::{init_pool, DbPool};
use slides_db::queries::{auth_tokens, files, users};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

/// Open the attachment database, creating its directory if needed.
fn open_database(config: &Config) -> Result<DbPool> {
    let db_path = config.storage.database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
    }

    let db_path_str = db_path.to_string_lossy();
    tracing::info!("Opening database at {}", db_path_str);
    let pool = init_pool(&db_path_str)?;
    Ok(pool)
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting slides media server");

    let db_pool = open_database(&config)?;
    server::start_server(config, db_pool).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "slides=trace,slides_db=debug,tower_http=debug".to_string()
        } else {
            "slides=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Register {
            src,
            private,
            owner,
            attached_to,
        } => register_file(
            cli.config.as_deref(),
            &src,
            private,
            owner.as_deref(),
            attached_to.as_deref(),
        ),
        Commands::Remove { src } => remove_file(cli.config.as_deref(), &src),
        Commands::CreateUser { username, admin } => {
            create_user(cli.config.as_deref(), &username, admin)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::GenerateApiKey => generate_api_key(),
        Commands::Version => {
            println!("slides {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn register_file(
    config_path: Option<&Path>,
    src: &str,
    private: bool,
    owner: Option<&str>,
    attached_to: Option<&str>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if private && !is_private_url(src) {
        anyhow::bail!("--private requires a /private/files/ URL, got {}", src);
    }

    let path = storage_path(&config.storage.site_root, src)?;
    let size = LocalFileSystem
        .size(&path)
        .with_context(|| format!("No file at {:?}", path))?;

    let pool = open_database(&config)?;
    let conn = pool.get()?;

    let owner_id = match owner {
        Some(username) => Some(
            users::get_user_by_username(&conn, username)?
                .with_context(|| format!("Unknown user: {}", username))?
                .id,
        ),
        None => None,
    };

    let file_name = src.rsplit('/').next().unwrap_or(src);
    let record = files::create_file(
        &conn,
        src,
        file_name,
        is_private_url(src),
        owner_id,
        attached_to,
    )?;

    println!("Registered {} ({} bytes)", record.file_url, size);
    println!("  id: {}", record.id);
    println!("  private: {}", record.is_private);
    Ok(())
}

fn remove_file(config_path: Option<&Path>, src: &str) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_database(&config)?;
    let conn = pool.get()?;

    let record = housekeeping::find_attachment(&conn, src)?
        .with_context(|| format!("No attachment registered for {}", src))?;

    housekeeping::remove_attachment(&conn, &LocalFileSystem, &config.storage.site_root, &record)?;
    println!("Removed {}", record.file_url);
    Ok(())
}

fn create_user(config_path: Option<&Path>, username: &str, admin: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_database(&config)?;
    let conn = pool.get()?;

    let user = users::create_user(&conn, username, admin)?;
    let token = auth_tokens::create_token(&conn, user.id)?;

    println!("Created user {} ({})", user.username, user.id);
    println!("Bearer token: {}", token.token);
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Site root: {}", config.storage.site_root.display());
    println!("  Database: {}", config.storage.database_path().display());
    println!(
        "  Admin API key: {}",
        if config.auth.admin_api_key.is_some() {
            "set"
        } else {
            "not set"
        }
    );

    Ok(())
}

fn generate_api_key() -> Result<()> {
    let key = auth::generate_api_key();
    println!("{}", key);
    Ok(())
}
