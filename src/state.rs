use std::sync::Arc;

use anyhow::{Context, Result};

use crate::auth::{IdentityProvider, TokenSettings};
use crate::config::{Config, StorageBackend};
use crate::db::{ensure_schema, init_db};
use crate::repo::{FileRepository, PayslipRepository};
use crate::store::{
    BlobStore, FsBlobStore, MemoryBlobStore, MemoryStore, MySqlStore, PayslipFileStore,
    PayslipStore, UserStore,
};

/// Shared application services, handed to handlers as `web::Data<AppState>`.
pub struct AppState {
    pub identity: Arc<IdentityProvider>,
    pub payslips: PayslipRepository,
    pub files: FileRepository,
}

impl AppState {
    pub fn from_parts(
        users: Arc<dyn UserStore>,
        payslips: Arc<dyn PayslipStore>,
        files: Arc<dyn PayslipFileStore>,
        blobs: Arc<dyn BlobStore>,
        tokens: TokenSettings,
    ) -> Self {
        Self {
            identity: Arc::new(IdentityProvider::new(users, tokens)),
            payslips: PayslipRepository::new(payslips),
            files: FileRepository::new(blobs, files),
        }
    }

    /// Everything in memory, e.g. for tests and local demos.
    pub fn in_memory(tokens: TokenSettings) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(
            store.clone(),
            store.clone(),
            store,
            Arc::new(MemoryBlobStore::new()),
            tokens,
        )
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let tokens = TokenSettings {
            secret: config.jwt_secret.clone(),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        };

        match config.storage_backend {
            StorageBackend::Memory => Ok(Self::in_memory(tokens)),
            StorageBackend::Mysql => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set")?;
                let pool = init_db(url).await.context("Failed to connect to database")?;
                ensure_schema(&pool).await.context("Failed to create tables")?;

                let store = Arc::new(MySqlStore::new(pool));
                let blobs = Arc::new(FsBlobStore::new(&config.blob_root, &config.blob_public_url));
                Ok(Self::from_parts(
                    store.clone(),
                    store.clone(),
                    store,
                    blobs,
                    tokens,
                ))
            }
        }
    }
}
