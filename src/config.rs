//! Runtime configuration
//!
//! Loaded from a TOML file with environment overrides, e.g.
//! `TRADELOG_SERVER__PORT=9000` overrides `server.port`. Every field has a
//! default, so the service also runs with no config file at all.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted statement upload, in megabytes.
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_mb: default_max_size_mb(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_size_mb() -> usize {
    10
}

impl Config {
    /// Load configuration from `path` (if present) and the environment.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        // Pull in a local .env before reading environment overrides.
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("TRADELOG").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
