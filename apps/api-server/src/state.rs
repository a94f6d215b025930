//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::PostService;
use quill_core::ports::{BlobStore, PostRepository, TokenService};
use quill_infra::{InMemoryBlobStore, InMemoryPostRepository, JwtTokenService, LocalBlobStore};

#[cfg(feature = "postgres")]
use quill_infra::{PostgresPostRepository, database};

use crate::config::{AppConfig, StorageConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub tokens: Arc<dyn TokenService>,
    pub max_upload_bytes: usize,
    /// Backend names reported by the health check.
    pub backends: Backends,
}

#[derive(Debug, Clone, Copy)]
pub struct Backends {
    pub database: &'static str,
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (repo, database) = Self::init_repository(config).await;

        let (blobs, storage): (Arc<dyn BlobStore>, &'static str) = match &config.storage {
            StorageConfig::Local(root) => {
                tracing::info!("Storing uploads below {}", root.display());
                (Arc::new(LocalBlobStore::new(root.clone())), "local")
            }
            StorageConfig::Memory => {
                tracing::warn!("STORAGE_ROOT=memory. Uploaded files are lost on restart.");
                (Arc::new(InMemoryBlobStore::new()), "memory")
            }
        };

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        tracing::info!("Application state initialized");

        Self {
            posts: PostService::new(repo, blobs),
            tokens,
            max_upload_bytes: config.max_upload_bytes,
            backends: Backends { database, storage },
        }
    }

    /// Assemble state from already-built adapters.
    pub fn from_parts(
        repo: Arc<dyn PostRepository>,
        blobs: Arc<dyn BlobStore>,
        tokens: Arc<dyn TokenService>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            posts: PostService::new(repo, blobs),
            tokens,
            max_upload_bytes,
            backends: Backends {
                database: "custom",
                storage: "custom",
            },
        }
    }

    #[cfg(feature = "postgres")]
    async fn init_repository(config: &AppConfig) -> (Arc<dyn PostRepository>, &'static str) {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (Arc::new(InMemoryPostRepository::new()), "memory");
        };

        match database::connect(db_config).await {
            Ok(conn) => (Arc::new(PostgresPostRepository::new(conn)), "postgres"),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (Arc::new(InMemoryPostRepository::new()), "memory")
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn init_repository(_config: &AppConfig) -> (Arc<dyn PostRepository>, &'static str) {
        tracing::info!("Running without postgres feature - using in-memory repository");
        (Arc::new(InMemoryPostRepository::new()), "memory")
    }
}
