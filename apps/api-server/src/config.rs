//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use quill_infra::JwtConfig;
use quill_infra::database::DatabaseConfig;

const DEFAULT_STORAGE_ROOT: &str = "./storage/app";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Where uploaded images are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Files below this directory.
    Local(PathBuf),
    /// Process memory only (`STORAGE_ROOT=memory`).
    Memory,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub storage: StorageConfig,
    /// Upper bound on a create/update request body.
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        let storage = Self::parse_storage(
            &env::var("STORAGE_ROOT").unwrap_or_else(|_| DEFAULT_STORAGE_ROOT.to_string()),
        );

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            storage,
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            jwt: JwtConfig::from_env(),
        }
    }

    fn parse_storage(value: &str) -> StorageConfig {
        match value.trim() {
            "memory" => StorageConfig::Memory,
            "" => StorageConfig::Local(PathBuf::from(DEFAULT_STORAGE_ROOT)),
            root => StorageConfig::Local(PathBuf::from(root)),
        }
    }
}
