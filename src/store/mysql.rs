use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use super::{PayslipFileStore, PayslipStore, StoreError, UserStore};
use crate::model::{Payslip, PayslipFile, PayslipPatch, User};
use crate::utils::db_utils::{build_payslip_update, execute_update};

const PAYSLIP_COLUMNS: &str = "id, employee_name, employee_id, salary, deductions, tax_amount, \
     net_pay, month, year, payment_date, created_at, updated_at, user_id";

const FILE_COLUMNS: &str = "id, name, url, content_type, size, created_at, user_id";

/// MySQL-backed adapter for the record, file-metadata and user tables.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23000"),
        _ => false,
    }
}

#[async_trait]
impl PayslipStore for MySqlStore {
    async fn insert(&self, record: &Payslip) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO payslips
            (id, employee_name, employee_id, salary, deductions, tax_amount,
             net_pay, month, year, payment_date, created_at, updated_at, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.employee_name)
        .bind(&record.employee_id)
        .bind(record.salary)
        .bind(record.deductions)
        .bind(record.tax_amount)
        .bind(record.net_pay)
        .bind(record.month.to_string())
        .bind(&record.year)
        .bind(record.payment_date)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(&record.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::Conflict
            } else {
                StoreError::Database(e)
            }
        })?;
        Ok(())
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Payslip>, StoreError> {
        let sql = format!(
            "SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE user_id = ? ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, Payslip>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(
        &self,
        owner: &str,
        id: &str,
        patch: &PayslipPatch,
        now: DateTime<Utc>,
    ) -> Result<Payslip, StoreError> {
        let update = build_payslip_update(patch, id, owner, now);
        execute_update(&self.pool, update).await?;

        // MySQL reports zero affected rows for no-op writes, so existence is
        // decided by the read-back instead.
        let sql = format!("SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE id = ? AND user_id = ?");
        sqlx::query_as::<_, Payslip>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM payslips WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PayslipFileStore for MySqlStore {
    async fn insert(&self, record: &PayslipFile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO payslip_files (id, name, url, content_type, size, created_at, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.url)
        .bind(&record.content_type)
        .bind(record.size)
        .bind(record.created_at)
        .bind(&record.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<PayslipFile>, StoreError> {
        let sql = format!(
            "SELECT {FILE_COLUMNS} FROM payslip_files WHERE user_id = ? ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, PayslipFile>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, owner: &str, id: &str) -> Result<Option<PayslipFile>, StoreError> {
        let sql = format!("SELECT {FILE_COLUMNS} FROM payslip_files WHERE id = ? AND user_id = ?");
        let row = sqlx::query_as::<_, PayslipFile>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM payslip_files WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for MySqlStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)"#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::Conflict
            } else {
                StoreError::Database(e)
            }
        })?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists != 0)
    }

    async fn emails(&self) -> Result<Vec<String>, StoreError> {
        let emails = sqlx::query_scalar::<_, String>("SELECT email FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(emails)
    }

    async fn store_refresh_token(
        &self,
        user_id: &str,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, jti, expires_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn revoke_refresh_token(&self, jti: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE jti = ? AND revoked = FALSE
            "#,
        )
        .bind(jti)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
