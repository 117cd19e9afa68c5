//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "bloglist.toml",
    "./config/config.toml",
    "/etc/bloglist/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides,
    /// then validate it.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) but reads overrides through `lookup`.
    pub fn load_with<F>(&self, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file(&lookup) {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, &lookup)?;

        config.validate()
    }

    fn find_config_file<F>(&self, lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured config file does not exist");
        }

        if let Some(path) = lookup("BLOGLIST_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, val: &str) -> Option<T> {
    match val.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, value = val, "Ignoring unparseable environment override");
            None
        }
    }
}

fn apply_overrides<F>(config: &mut AppConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(port) = lookup("BLOGLIST_HTTP_PORT").and_then(|v| parse_var("BLOGLIST_HTTP_PORT", &v)) {
        config.http.port = port;
    }
    if let Some(val) = lookup("BLOGLIST_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(val) = lookup("BLOGLIST_CORS_ORIGINS") {
        config.http.cors_origins = val.split(',').map(|s| s.trim().to_string()).collect();
    }

    // MongoDB
    if let Some(val) = lookup("BLOGLIST_MONGODB_URI") {
        config.mongodb.uri = val;
    }
    if let Some(val) = lookup("BLOGLIST_MONGODB_DATABASE") {
        config.mongodb.database = val;
    }

    // Storage
    if let Some(val) = lookup("BLOGLIST_STORAGE_BACKEND") {
        config.storage.backend = val.parse()?;
    }

    // Auth
    if let Some(val) = lookup("BLOGLIST_JWT_SECRET") {
        config.auth.jwt.secret = val;
    }
    if let Some(val) = lookup("BLOGLIST_JWT_ISSUER") {
        config.auth.jwt.issuer = val;
    }
    if let Some(secs) = lookup("BLOGLIST_JWT_EXPIRY_SECS").and_then(|v| parse_var("BLOGLIST_JWT_EXPIRY_SECS", &v)) {
        config.auth.jwt.token_expiry_secs = secs;
    }
    if let Some(len) = lookup("BLOGLIST_PASSWORD_MIN_LENGTH").and_then(|v| parse_var("BLOGLIST_PASSWORD_MIN_LENGTH", &v)) {
        config.auth.password.min_length = len;
    }

    // General
    if let Some(val) = lookup("BLOGLIST_DEV_MODE") {
        config.dev_mode = val == "true" || val == "1";
    }

    Ok(())
}
