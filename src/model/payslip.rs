use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::month::Month;

/// A stored payslip, always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    #[schema(example = "6f1c2a9e-8d0b-4a41-9b1e-0c7d1f6f2a10")]
    pub id: String,

    #[schema(example = "Jane Doe")]
    pub employee_name: String,

    #[schema(example = "EMP007")]
    pub employee_id: String,

    #[schema(example = 6000.0)]
    pub salary: f64,

    #[schema(example = 600.0)]
    pub deductions: f64,

    #[schema(example = 900.0)]
    pub tax_amount: f64,

    /// Derived once at submission time and stored as-is afterwards.
    #[schema(example = 4500.0)]
    pub net_pay: f64,

    #[sqlx(try_from = "String")]
    pub month: Month,

    #[schema(example = "2024")]
    pub year: String,

    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub payment_date: NaiveDate,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,

    pub user_id: String,
}

/// A payslip as submitted, before the backend assigns id, owner and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayslip {
    pub employee_name: String,
    pub employee_id: String,
    pub salary: f64,
    pub deductions: f64,
    pub tax_amount: f64,
    pub net_pay: f64,
    pub month: Month,
    pub year: String,
    pub payment_date: NaiveDate,
}

impl NewPayslip {
    pub fn into_record(self, id: String, user_id: String, now: DateTime<Utc>) -> Payslip {
        Payslip {
            id,
            employee_name: self.employee_name,
            employee_id: self.employee_id,
            salary: self.salary,
            deductions: self.deductions,
            tax_amount: self.tax_amount,
            net_pay: self.net_pay,
            month: self.month,
            year: self.year,
            payment_date: self.payment_date,
            created_at: now,
            updated_at: now,
            user_id,
        }
    }
}

/// Net pay as the submission form derives it.
pub fn net_pay(salary: f64, deductions: f64, tax_amount: f64) -> f64 {
    salary - deductions - tax_amount
}

/// Fields a partial update may carry. `net_pay` is never re-derived from the
/// other amounts; it only changes when the patch sets it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipPatch {
    #[schema(example = "Jane Smith")]
    pub employee_name: Option<String>,
    pub employee_id: Option<String>,
    #[schema(example = 6500.0)]
    pub salary: Option<f64>,
    pub deductions: Option<f64>,
    pub tax_amount: Option<f64>,
    pub net_pay: Option<f64>,
    pub month: Option<Month>,
    pub year: Option<String>,
    #[schema(example = "2024-03-01", value_type = Option<String>, format = "date")]
    pub payment_date: Option<NaiveDate>,
}

impl PayslipPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the set fields into `record` and stamp `updated_at`.
    pub fn apply_to(&self, record: &mut Payslip, now: DateTime<Utc>) {
        if let Some(v) = &self.employee_name {
            record.employee_name = v.clone();
        }
        if let Some(v) = &self.employee_id {
            record.employee_id = v.clone();
        }
        if let Some(v) = self.salary {
            record.salary = v;
        }
        if let Some(v) = self.deductions {
            record.deductions = v;
        }
        if let Some(v) = self.tax_amount {
            record.tax_amount = v;
        }
        if let Some(v) = self.net_pay {
            record.net_pay = v;
        }
        if let Some(v) = self.month {
            record.month = v;
        }
        if let Some(v) = &self.year {
            record.year = v.clone();
        }
        if let Some(v) = self.payment_date {
            record.payment_date = v;
        }
        record.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Payslip {
        NewPayslip {
            employee_name: "Jane Doe".into(),
            employee_id: "EMP007".into(),
            salary: 6000.0,
            deductions: 600.0,
            tax_amount: 900.0,
            net_pay: net_pay(6000.0, 600.0, 900.0),
            month: Month::March,
            year: "2024".into(),
            payment_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
        .into_record("p1".into(), "u1".into(), Utc::now())
    }

    #[test]
    fn net_pay_subtracts_deductions_and_tax() {
        assert_eq!(net_pay(5000.0, 500.0, 1000.0), 3500.0);
        assert_eq!(net_pay(6000.0, 600.0, 900.0), 4500.0);
    }

    #[test]
    fn patch_leaves_net_pay_frozen() {
        let mut record = sample();
        let patch = PayslipPatch {
            salary: Some(9000.0),
            ..Default::default()
        };
        patch.apply_to(&mut record, Utc::now());

        assert_eq!(record.salary, 9000.0);
        assert_eq!(record.net_pay, 4500.0);
    }

    #[test]
    fn patch_refreshes_updated_at_only() {
        let mut record = sample();
        let created = record.created_at;
        let later = created + chrono::Duration::seconds(30);
        PayslipPatch {
            employee_name: Some("Jane Smith".into()),
            ..Default::default()
        }
        .apply_to(&mut record, later);

        assert_eq!(record.employee_name, "Jane Smith");
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, later);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["employeeName"], "Jane Doe");
        assert_eq!(json["taxAmount"], 900.0);
        assert_eq!(json["netPay"], 4500.0);
        assert_eq!(json["month"], "March");
        assert_eq!(json["paymentDate"], "2024-03-01");
    }
}
