use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Site directory holding `public/files` and `private/files`
    #[serde(default = "default_site_root")]
    pub site_root: PathBuf,

    /// SQLite database file; relative paths resolve against `site_root`
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

fn default_site_root() -> PathBuf {
    PathBuf::from("./sites/default")
}
fn default_database() -> PathBuf {
    PathBuf::from("slides.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            site_root: default_site_root(),
            database: default_database(),
        }
    }
}

impl StorageConfig {
    /// Location of the database file on disk.
    pub fn database_path(&self) -> PathBuf {
        if self.database.is_absolute() {
            self.database.clone()
        } else {
            self.site_root.join(&self.database)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Key granting administrator access (sent as `Authorization: Bearer <key>`).
    /// Generate one with `slides generate-api-key`.
    #[serde(default)]
    pub admin_api_key: Option<String>,
}
