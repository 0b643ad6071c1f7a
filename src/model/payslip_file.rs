use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Metadata for an uploaded payslip document. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipFile {
    pub id: String,

    #[schema(example = "march-2024.pdf")]
    pub name: String,

    #[schema(example = "http://localhost:8080/blobs/payslips/u1/1709251200000_march-2024.pdf")]
    pub url: String,

    #[schema(example = "application/pdf")]
    pub content_type: String,

    #[schema(example = 48213)]
    pub size: i64,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayslipFile {
    pub name: String,
    pub url: String,
    pub content_type: String,
    pub size: i64,
}

impl NewPayslipFile {
    pub fn into_record(self, id: String, user_id: String, now: DateTime<Utc>) -> PayslipFile {
        PayslipFile {
            id,
            name: self.name,
            url: self.url,
            content_type: self.content_type,
            size: self.size,
            created_at: now,
            user_id,
        }
    }
}
