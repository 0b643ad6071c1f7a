use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

use crate::model::PayslipPatch;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    F64(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build a scoped partial UPDATE for `payslips`
/// ===============================
/// Only columns present in the patch are written, plus `updated_at`. The
/// statement is always constrained by both id and owner.
pub fn build_payslip_update(
    patch: &PayslipPatch,
    id: &str,
    owner: &str,
    now: DateTime<Utc>,
) -> SqlUpdate {
    let mut columns: Vec<&'static str> = Vec::new();
    let mut values = Vec::new();

    let mut set = |column: &'static str, value: SqlValue| {
        columns.push(column);
        values.push(value);
    };

    if let Some(v) = &patch.employee_name {
        set("employee_name", SqlValue::String(v.clone()));
    }
    if let Some(v) = &patch.employee_id {
        set("employee_id", SqlValue::String(v.clone()));
    }
    if let Some(v) = patch.salary {
        set("salary", SqlValue::F64(v));
    }
    if let Some(v) = patch.deductions {
        set("deductions", SqlValue::F64(v));
    }
    if let Some(v) = patch.tax_amount {
        set("tax_amount", SqlValue::F64(v));
    }
    if let Some(v) = patch.net_pay {
        set("net_pay", SqlValue::F64(v));
    }
    if let Some(v) = patch.month {
        set("month", SqlValue::String(v.to_string()));
    }
    if let Some(v) = &patch.year {
        set("year", SqlValue::String(v.clone()));
    }
    if let Some(v) = patch.payment_date {
        set("payment_date", SqlValue::Date(v));
    }
    set("updated_at", SqlValue::Timestamp(now));

    // Build SET clause
    let set_clause = columns
        .iter()
        .map(|c| format!("{} = ?", c))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE payslips SET {} WHERE id = ? AND user_id = ?",
        set_clause
    );

    // WHERE id = ? AND user_id = ?
    values.push(SqlValue::String(id.to_string()));
    values.push(SqlValue::String(owner.to_string()));

    SqlUpdate { sql, values }
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::Timestamp(v) => query.bind(v),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}
