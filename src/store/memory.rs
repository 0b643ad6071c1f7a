//! In-process adapters used by `STORAGE_BACKEND=memory` and the test suite.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use actix_web::web::Bytes;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{BlobStore, PayslipFileStore, PayslipStore, StoreError, UserStore};
use crate::model::{Payslip, PayslipFile, PayslipPatch, User};

#[derive(Default)]
struct Tables {
    // insertion order, so equal timestamps still list newest first
    payslips: Vec<Payslip>,
    files: Vec<PayslipFile>,
    users: HashMap<String, User>,
    // jti -> revoked
    refresh_tokens: HashMap<String, bool>,
}

/// Document-store adapter backed by a lock-guarded set of vectors.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

trait OwnedRow: Clone {
    fn owner(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

impl OwnedRow for Payslip {
    fn owner(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl OwnedRow for PayslipFile {
    fn owner(&self) -> &str {
        &self.user_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn newest_first<T: OwnedRow>(rows: &[T], owner: &str) -> Vec<T> {
    let mut owned: Vec<T> = rows
        .iter()
        .rev()
        .filter(|r| r.owner() == owner)
        .cloned()
        .collect();
    owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    owned
}

#[async_trait]
impl PayslipStore for MemoryStore {
    async fn insert(&self, record: &Payslip) -> Result<(), StoreError> {
        let mut tables = self.write();
        if tables.payslips.iter().any(|p| p.id == record.id) {
            return Err(StoreError::Conflict);
        }
        tables.payslips.push(record.clone());
        Ok(())
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Payslip>, StoreError> {
        Ok(newest_first(&self.read().payslips, owner))
    }

    async fn update(
        &self,
        owner: &str,
        id: &str,
        patch: &PayslipPatch,
        now: DateTime<Utc>,
    ) -> Result<Payslip, StoreError> {
        let mut tables = self.write();
        let record = tables
            .payslips
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner)
            .ok_or(StoreError::NotFound)?;
        patch.apply_to(record, now);
        Ok(record.clone())
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.write();
        let before = tables.payslips.len();
        tables.payslips.retain(|p| !(p.id == id && p.user_id == owner));
        Ok(tables.payslips.len() != before)
    }
}

#[async_trait]
impl PayslipFileStore for MemoryStore {
    async fn insert(&self, record: &PayslipFile) -> Result<(), StoreError> {
        let mut tables = self.write();
        if tables.files.iter().any(|f| f.id == record.id) {
            return Err(StoreError::Conflict);
        }
        tables.files.push(record.clone());
        Ok(())
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<PayslipFile>, StoreError> {
        Ok(newest_first(&self.read().files, owner))
    }

    async fn get(&self, owner: &str, id: &str) -> Result<Option<PayslipFile>, StoreError> {
        Ok(self
            .read()
            .files
            .iter()
            .find(|f| f.id == id && f.user_id == owner)
            .cloned())
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.write();
        let before = tables.files.len();
        tables.files.retain(|f| !(f.id == id && f.user_id == owner));
        Ok(tables.files.len() != before)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.write();
        if tables.users.contains_key(&user.email) {
            return Err(StoreError::Conflict);
        }
        tables.users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.get(email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.read().users.contains_key(email))
    }

    async fn emails(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read().users.keys().cloned().collect())
    }

    async fn store_refresh_token(
        &self,
        _user_id: &str,
        jti: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.write().refresh_tokens.insert(jti.to_string(), false);
        Ok(())
    }

    async fn revoke_refresh_token(&self, jti: &str) -> Result<bool, StoreError> {
        match self.write().refresh_tokens.get_mut(jti) {
            Some(revoked) if !*revoked => {
                *revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

const MEMORY_BLOB_BASE: &str = "memory://blobs";

/// Blob adapter keeping file contents in a map keyed by path.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn path_of(address: &str) -> Result<&str, StoreError> {
        address
            .strip_prefix(MEMORY_BLOB_BASE)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|path| !path.is_empty())
            .ok_or_else(|| StoreError::InvalidAddress(address.to_string()))
    }

    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, _content_type: &str, bytes: Bytes) -> Result<(), StoreError> {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), bytes);
        Ok(())
    }

    fn address_of(&self, path: &str) -> String {
        format!("{MEMORY_BLOB_BASE}/{path}")
    }

    async fn get(&self, address: &str) -> Result<Bytes, StoreError> {
        let path = Self::path_of(address)?;
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, address: &str) -> Result<(), StoreError> {
        let path = Self::path_of(address)?;
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Month, NewPayslip};
    use chrono::{Duration, NaiveDate};

    fn payslip(id: &str, owner: &str, created_at: DateTime<Utc>) -> Payslip {
        NewPayslip {
            employee_name: "Jane Doe".into(),
            employee_id: "EMP007".into(),
            salary: 6000.0,
            deductions: 600.0,
            tax_amount: 900.0,
            net_pay: 4500.0,
            month: Month::March,
            year: "2024".into(),
            payment_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
        .into_record(id.into(), owner.into(), created_at)
    }

    #[actix_web::test]
    async fn lists_only_owned_records_newest_first() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        PayslipStore::insert(&store, &payslip("a", "alice", t0)).await.unwrap();
        PayslipStore::insert(&store, &payslip("b", "bob", t0)).await.unwrap();
        PayslipStore::insert(&store, &payslip("c", "alice", t0 + Duration::seconds(5)))
            .await
            .unwrap();

        let ids: Vec<String> = PayslipStore::list_by_owner(&store, "alice")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[actix_web::test]
    async fn update_and_delete_are_owner_scoped() {
        let store = MemoryStore::new();
        PayslipStore::insert(&store, &payslip("a", "alice", Utc::now())).await.unwrap();

        let patch = PayslipPatch {
            year: Some("2025".into()),
            ..Default::default()
        };
        let err = PayslipStore::update(&store, "bob", "a", &patch, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(!PayslipStore::delete(&store, "bob", "a").await.unwrap());

        let updated = PayslipStore::update(&store, "alice", "a", &patch, Utc::now())
            .await
            .unwrap();
        assert_eq!(updated.year, "2025");
        assert!(PayslipStore::delete(&store, "alice", "a").await.unwrap());
        assert!(PayslipStore::list_by_owner(&store, "alice").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn refresh_token_revokes_once() {
        let store = MemoryStore::new();
        store.store_refresh_token("u1", "jti-1", Utc::now()).await.unwrap();

        assert!(store.revoke_refresh_token("jti-1").await.unwrap());
        assert!(!store.revoke_refresh_token("jti-1").await.unwrap());
        assert!(!store.revoke_refresh_token("unknown").await.unwrap());
    }

    #[actix_web::test]
    async fn blob_addresses_round_through_the_store() {
        let blobs = MemoryBlobStore::new();
        blobs
            .put("payslips/u1/1_a.pdf", "application/pdf", Bytes::from_static(b"%PDF"))
            .await
            .unwrap();
        let address = blobs.address_of("payslips/u1/1_a.pdf");

        assert_eq!(blobs.get(&address).await.unwrap(), Bytes::from_static(b"%PDF"));
        blobs.delete(&address).await.unwrap();
        assert!(matches!(blobs.delete(&address).await, Err(StoreError::NotFound)));
        assert!(matches!(
            blobs.get("https://elsewhere/x").await,
            Err(StoreError::InvalidAddress(_))
        ));
    }
}
