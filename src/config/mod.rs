//! Configuration Module
//!
//! Centralized configuration management for the LMS service: server,
//! database, JWT, and object storage settings, all sourced from the
//! environment.

use anyhow::Result;

use crate::database::DatabaseConfig;

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as i64 with default
    pub fn get_i64(key: &str, default: i64) -> i64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as usize with default
    pub fn get_usize(key: &str, default: usize) -> usize {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get required environment variable or error
    pub fn get_required(key: &str) -> anyhow::Result<String> {
        env::var(key).map_err(|_| anyhow::anyhow!("{} environment variable is required", key))
    }
}

/// Application configuration combining all service configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Upper bound for multipart request bodies (course media uploads)
    pub max_body_bytes: usize,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime; the frontend expects day-long sessions
    pub expires_hours: i64,
}

/// Object storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// REST endpoint of the storage service
    pub api_base: String,
    /// Bucket all course media lives in
    pub bucket: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env::get_string("HOST", "0.0.0.0"),
                port: env::get_u16("PORT", 4005),
                cors_origins: env::get_string("CORS_ORIGINS", "")
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                max_body_bytes: env::get_usize("MAX_BODY_BYTES", 100 * 1024 * 1024),
            },
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig {
                secret: env::get_required("JWT_SECRET")?,
                expires_hours: env::get_i64("JWT_EXPIRES_HOURS", 24),
            },
            storage: StorageConfig {
                api_base: env::get_string(
                    "STORAGE_API_BASE",
                    "https://firebasestorage.googleapis.com",
                ),
                bucket: env::get_required("STORAGE_BUCKET")?,
            },
        })
    }

    /// Basic sanity checks beyond per-field parsing
    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.len() < 16 {
            anyhow::bail!("JWT_SECRET must be at least 16 characters");
        }
        if self.jwt.expires_hours <= 0 {
            anyhow::bail!("JWT_EXPIRES_HOURS must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_helpers_defaults() {
        assert_eq!(env::get_string("LMS_TEST_UNSET_STRING", "fallback"), "fallback");
        assert_eq!(env::get_u16("LMS_TEST_UNSET_U16", 4005), 4005);
        assert_eq!(env::get_i64("LMS_TEST_UNSET_I64", 24), 24);
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let config = AppConfig {
            server: ServerConfig {
                host: "localhost".to_string(),
                port: 4005,
                cors_origins: vec![],
                max_body_bytes: 1024,
            },
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: "short".to_string(),
                expires_hours: 24,
            },
            storage: StorageConfig {
                api_base: "https://firebasestorage.googleapis.com".to_string(),
                bucket: "lms-media".to_string(),
            },
        };
        assert!(config.validate().is_err());
    }
}
