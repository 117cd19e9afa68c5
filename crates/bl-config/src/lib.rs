//! Bloglist Configuration System
//!
//! TOML-based configuration with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Secret used when dev mode is on and no secret was configured
pub const DEV_JWT_SECRET: &str = "bloglist-development-secret";

/// Upper bound for `auth.jwt.token_expiry_secs` (ten years)
pub const MAX_TOKEN_EXPIRY_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub mongodb: MongoConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,

    /// Enable development mode
    pub dev_mode: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 3003,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl HttpConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "bloglist".to_string(),
        }
    }
}

/// Which repository implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongodb,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::Mongodb),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::ValidationError(format!(
                "unknown storage backend '{}' (expected mongodb or memory)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Mongodb,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// HMAC signing secret
    pub secret: String,
    pub issuer: String,
    /// Validity window of issued tokens
    pub token_expiry_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "bloglist".to_string(),
            token_expiry_secs: 3600, // 1 hour
        }
    }
}

/// Registration password rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub min_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { min_length: 3 }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Check the configuration and fill in dev-mode defaults.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.auth.jwt.secret.is_empty() {
            if !self.dev_mode {
                return Err(ConfigError::ValidationError(
                    "auth.jwt.secret must be set (or enable dev_mode)".to_string(),
                ));
            }
            tracing::warn!("No JWT secret configured, using the development secret");
            self.auth.jwt.secret = DEV_JWT_SECRET.to_string();
        }

        if self.auth.jwt.token_expiry_secs == 0 {
            return Err(ConfigError::ValidationError(
                "auth.jwt.token_expiry_secs must be greater than zero".to_string(),
            ));
        }

        if self.auth.jwt.token_expiry_secs > MAX_TOKEN_EXPIRY_SECS {
            return Err(ConfigError::ValidationError(format!(
                "auth.jwt.token_expiry_secs must be at most {}",
                MAX_TOKEN_EXPIRY_SECS
            )));
        }

        if self.auth.password.min_length == 0 {
            return Err(ConfigError::ValidationError(
                "auth.password.min_length must be greater than zero".to_string(),
            ));
        }

        Ok(self)
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Bloglist Configuration
# Environment variables (BLOGLIST_*) override these settings

dev_mode = false

[http]
port = 3003
host = "0.0.0.0"
cors_origins = ["*"]

[mongodb]
uri = "mongodb://localhost:27017"
database = "bloglist"

[storage]
backend = "mongodb"  # mongodb or memory

[auth.jwt]
secret = "change-me"
issuer = "bloglist"
token_expiry_secs = 3600

[auth.password]
min_length = 3
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_toml_parses() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();
        assert_eq!(config.http.port, 3003);
        assert_eq!(config.storage.backend, StorageBackend::Mongodb);
        assert_eq!(config.auth.jwt.secret, "change-me");
        assert_eq!(config.auth.jwt.token_expiry_secs, 3600);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("[storage]\nbackend = \"memory\"\n").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.mongodb.database, "bloglist");
        assert_eq!(config.auth.password.min_length, 3);
    }

    #[test]
    fn test_missing_secret_rejected_outside_dev_mode() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_dev_mode_falls_back_to_dev_secret() {
        let config = AppConfig {
            dev_mode: true,
            ..AppConfig::default()
        };
        let config = config.validate().unwrap();
        assert_eq!(config.auth.jwt.secret, DEV_JWT_SECRET);
    }

    #[test]
    fn test_token_expiry_is_bounded() {
        let mut config = AppConfig {
            dev_mode: true,
            ..AppConfig::default()
        };
        config.auth.jwt.token_expiry_secs = MAX_TOKEN_EXPIRY_SECS;
        assert!(config.clone().validate().is_ok());

        config.auth.jwt.token_expiry_secs = MAX_TOKEN_EXPIRY_SECS + 1;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("Mongo".parse::<StorageBackend>().unwrap(), StorageBackend::Mongodb);
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
