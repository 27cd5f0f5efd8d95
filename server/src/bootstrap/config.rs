//! Application configuration, loaded from environment variables.
//!
//! Each helper follows the pattern: try env var, parse, fall back to default.
//! Only the JWT secret is mandatory; everything else has a development
//! default.

use std::path::PathBuf;
use std::time::Duration;

use errors::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_port: u16,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub logging_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for uploaded files (covers, PDFs, category images)
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Config("JWT_SECRET must be set".to_string()))?;

        Ok(Self {
            server: ServerConfig {
                rest_port: env_u16("REST_PORT", 8080),
            },
            db: DbConfig {
                url: env_string("DATABASE_URL", "sqlite://library.db?mode=rwc"),
                max_connections: env_u32("DB_MAX_CONNECTIONS", 10),
                min_connections: env_u32("DB_MIN_CONNECTIONS", 1),
                connect_timeout: env_duration_secs("DB_CONNECT_TIMEOUT_SECS", 10),
                idle_timeout: env_duration_secs("DB_IDLE_TIMEOUT_SECS", 300),
                max_lifetime: env_duration_secs("DB_MAX_LIFETIME_SECS", 3600),
                logging_enabled: env_bool("DB_LOGGING", false),
            },
            cors: CorsConfig {
                allowed_origins: env_list("CORS_ALLOWED_ORIGINS", "http://localhost:5173"),
                allow_credentials: env_bool("CORS_ALLOW_CREDENTIALS", false),
            },
            storage: StorageConfig {
                root: env_path("STORAGE_ROOT", "storage/public"),
            },
            auth: AuthConfig { jwt_secret },
        })
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_duration_secs(key: &str, default_secs: u64) -> Duration {
    Duration::from_secs(
        std::env::var(key)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default_secs),
    )
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_string_default() {
        assert_eq!(env_string("CONFIG_TEST_UNSET_99", "fallback"), "fallback");
    }

    #[test]
    fn test_env_bool_default() {
        assert!(!env_bool("CONFIG_TEST_UNSET_99", false));
        assert!(env_bool("CONFIG_TEST_UNSET_99", true));
    }

    #[test]
    fn test_env_list_splits_and_trims() {
        let list = env_list("CONFIG_TEST_UNSET_99", "http://a , http://b,");
        assert_eq!(list, vec!["http://a".to_string(), "http://b".to_string()]);
    }
}
