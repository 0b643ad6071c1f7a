//! Persistence ports.
//!
//! Every record query and mutation is scoped by the owning user id; adapters
//! never return or touch another user's rows. Blob addresses are produced by
//! the blob store and are the only handle the rest of the crate keeps.

pub mod fs_blob;
pub mod memory;
pub mod mysql;

use actix_web::web::Bytes;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Payslip, PayslipFile, PayslipPatch, User};

pub use fs_blob::FsBlobStore;
pub use memory::{MemoryBlobStore, MemoryStore};
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("invalid blob address: {0}")]
    InvalidAddress(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("blob storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// The `payslips` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayslipStore: Send + Sync {
    async fn insert(&self, record: &Payslip) -> Result<(), StoreError>;

    /// All records owned by `owner`, newest `created_at` first.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Payslip>, StoreError>;

    /// Merge `patch` into the owner's record and return the stored result.
    /// Fails with [`StoreError::NotFound`] when no such record is owned by `owner`.
    async fn update(
        &self,
        owner: &str,
        id: &str,
        patch: &PayslipPatch,
        now: DateTime<Utc>,
    ) -> Result<Payslip, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, owner: &str, id: &str) -> Result<bool, StoreError>;
}

/// The `payslipFiles` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayslipFileStore: Send + Sync {
    async fn insert(&self, record: &PayslipFile) -> Result<(), StoreError>;

    /// All metadata owned by `owner`, newest upload first.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<PayslipFile>, StoreError>;

    async fn get(&self, owner: &str, id: &str) -> Result<Option<PayslipFile>, StoreError>;

    async fn delete(&self, owner: &str, id: &str) -> Result<bool, StoreError>;
}

/// Accounts and refresh-token bookkeeping for the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// Every registered email, used to warm the availability filter.
    async fn emails(&self) -> Result<Vec<String>, StoreError>;

    async fn store_refresh_token(
        &self,
        user_id: &str,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Revoke a refresh token. Returns `true` only if it was active before
    /// this call, so a token can be rotated at most once.
    async fn revoke_refresh_token(&self, jti: &str) -> Result<bool, StoreError>;
}

/// Path-addressed binary storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, path: &str, content_type: &str, bytes: Bytes) -> Result<(), StoreError>;

    /// Durable retrieval address for a stored path.
    fn address_of(&self, path: &str) -> String;

    async fn get(&self, address: &str) -> Result<Bytes, StoreError>;

    /// Fails with [`StoreError::NotFound`] when nothing is stored at `address`.
    async fn delete(&self, address: &str) -> Result<(), StoreError>;
}
