use std::sync::Arc;

use actix_web::web::Bytes;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::require_session;
use crate::auth::Session;
use crate::error::RepoError;
use crate::model::{NewPayslipFile, PayslipFile};
use crate::store::{BlobStore, PayslipFileStore, StoreError};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A document selected for upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Stored bytes of a document plus its metadata.
#[derive(Debug, Clone)]
pub struct Download {
    pub file: PayslipFile,
    pub bytes: Bytes,
}

/// Matches the `payslip_files.name` column.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Last path component of a client-supplied file name, without control
/// characters.
fn file_name(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next()?;
    let name: String = last.chars().filter(|c| !c.is_control()).collect();
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// Uploaded payslip documents: blob content plus a metadata record.
#[derive(Clone)]
pub struct FileRepository {
    blobs: Arc<dyn BlobStore>,
    meta: Arc<dyn PayslipFileStore>,
}

impl FileRepository {
    pub fn new(blobs: Arc<dyn BlobStore>, meta: Arc<dyn PayslipFileStore>) -> Self {
        Self { blobs, meta }
    }

    /// Store the blob under `payslips/{user}/{millis}_{id}_{name}`, then record its
    /// metadata. If the metadata write fails the blob is removed again.
    pub async fn upload(
        &self,
        session: Option<&Session>,
        upload: Upload,
    ) -> Result<PayslipFile, RepoError> {
        let session = require_session(session)?;
        let name = file_name(&upload.name)
            .ok_or_else(|| RepoError::Invalid("File name must not be empty".into()))?;
        if name.chars().count() > MAX_FILE_NAME_LEN {
            return Err(RepoError::Invalid(format!(
                "File name must be at most {MAX_FILE_NAME_LEN} characters"
            )));
        }
        let content_type = upload
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let size = upload.bytes.len() as i64;

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        // the id keeps same-millisecond uploads of one name apart
        let path = format!(
            "payslips/{}/{}_{}_{}",
            session.user_id,
            now.timestamp_millis(),
            id,
            name
        );

        self.blobs.put(&path, &content_type, upload.bytes).await?;
        let url = self.blobs.address_of(&path);

        let record = NewPayslipFile {
            name,
            url: url.clone(),
            content_type,
            size,
        }
        .into_record(id, session.user_id.clone(), now);

        if let Err(e) = self.meta.insert(&record).await {
            error!(error = %e, user_id = %session.user_id, path = %path, "Metadata write failed, removing blob");
            if let Err(rollback) = self.blobs.delete(&url).await {
                warn!(error = %rollback, url = %url, "Orphaned blob left behind");
            }
            return Err(e.into());
        }

        info!(user_id = %session.user_id, file_id = %record.id, size, "File uploaded");
        Ok(record)
    }

    /// Metadata of every file the caller owns, newest upload first.
    pub async fn list_for_current_user(
        &self,
        session: Option<&Session>,
    ) -> Result<Vec<PayslipFile>, RepoError> {
        let session = require_session(session)?;
        Ok(self.meta.list_by_owner(&session.user_id).await?)
    }

    pub async fn download(&self, session: Option<&Session>, id: &str) -> Result<Download, RepoError> {
        let session = require_session(session)?;
        let file = self
            .meta
            .get(&session.user_id, id)
            .await?
            .ok_or(RepoError::NotFound)?;
        let bytes = match self.blobs.get(&file.url).await {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound) => return Err(RepoError::NotFound),
            Err(e) => return Err(e.into()),
        };
        Ok(Download { file, bytes })
    }

    /// Delete the blob at `address`, then its metadata. `address` must be the
    /// one recorded for `id`. A blob that is already gone counts as deleted,
    /// so a retry after a failed metadata delete completes the removal.
    pub async fn delete(
        &self,
        session: Option<&Session>,
        id: &str,
        address: &str,
    ) -> Result<(), RepoError> {
        let session = require_session(session)?;
        let file = self
            .meta
            .get(&session.user_id, id)
            .await?
            .ok_or(RepoError::NotFound)?;
        if file.url != address {
            return Err(RepoError::NotFound);
        }

        match self.blobs.delete(address).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => {
                warn!(file_id = id, url = address, "Blob already gone, removing metadata");
            }
            Err(e) => return Err(e.into()),
        }

        self.meta.delete(&session.user_id, id).await?;
        info!(user_id = %session.user_id, file_id = id, "File deleted");
        Ok(())
    }
}
