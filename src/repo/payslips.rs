use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::require_session;
use crate::auth::Session;
use crate::error::RepoError;
use crate::model::{NewPayslip, Payslip, PayslipPatch};
use crate::store::{PayslipStore, StoreError};

/// Record access for the `payslips` collection. Every call needs a session
/// and is scoped to its user.
#[derive(Clone)]
pub struct PayslipRepository {
    store: Arc<dyn PayslipStore>,
}

impl PayslipRepository {
    pub fn new(store: Arc<dyn PayslipStore>) -> Self {
        Self { store }
    }

    /// Assign id, owner and timestamps, then store the record.
    pub async fn create(
        &self,
        session: Option<&Session>,
        payslip: NewPayslip,
    ) -> Result<Payslip, RepoError> {
        let session = require_session(session)?;
        let record = payslip.into_record(
            Uuid::new_v4().to_string(),
            session.user_id.clone(),
            Utc::now(),
        );
        self.store.insert(&record).await?;
        info!(user_id = %session.user_id, payslip_id = %record.id, "Payslip created");
        Ok(record)
    }

    /// Every record the caller owns, newest first.
    pub async fn list_for_current_user(
        &self,
        session: Option<&Session>,
    ) -> Result<Vec<Payslip>, RepoError> {
        let session = require_session(session)?;
        let records = self.store.list_by_owner(&session.user_id).await?;
        debug!(user_id = %session.user_id, count = records.len(), "Payslips fetched");
        Ok(records)
    }

    /// Merge `patch` into one of the caller's records. Last write wins.
    pub async fn update(
        &self,
        session: Option<&Session>,
        id: &str,
        patch: &PayslipPatch,
    ) -> Result<Payslip, RepoError> {
        let session = require_session(session)?;
        if patch.is_empty() {
            return Err(RepoError::Invalid("No fields provided for update".into()));
        }
        match self
            .store
            .update(&session.user_id, id, patch, Utc::now())
            .await
        {
            Ok(record) => {
                info!(user_id = %session.user_id, payslip_id = id, "Payslip updated");
                Ok(record)
            }
            Err(StoreError::NotFound) => Err(RepoError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove one of the caller's records. Deleting a missing id succeeds.
    pub async fn delete(&self, session: Option<&Session>, id: &str) -> Result<(), RepoError> {
        let session = require_session(session)?;
        let removed = self.store.delete(&session.user_id, id).await?;
        info!(user_id = %session.user_id, payslip_id = id, removed, "Payslip deleted");
        Ok(())
    }
}
