//! Submission form for a new payslip.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::model::payslip::net_pay;
use crate::model::{Month, NewPayslip, PayslipPatch};

/// A numeric input as a client may send it: a JSON number or the raw text
/// of a form field.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipForm {
    #[schema(example = "Jane Doe")]
    pub employee_name: String,
    #[schema(example = "EMP007")]
    pub employee_id: String,
    #[schema(value_type = f64, example = 6000.0)]
    pub salary: AmountInput,
    #[schema(value_type = f64, example = 600.0)]
    pub deductions: AmountInput,
    #[schema(value_type = f64, example = 900.0)]
    pub tax_amount: AmountInput,
    #[schema(example = "March")]
    pub month: String,
    #[schema(example = "2024")]
    pub year: String,
    #[schema(example = "2024-03-01")]
    pub payment_date: String,
}

/// Column widths of `payslips.employee_name` and `payslips.employee_id`.
pub const MAX_EMPLOYEE_NAME_LEN: usize = 255;
pub const MAX_EMPLOYEE_ID_LEN: usize = 64;

fn required(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn bounded_text(field: &str, value: &str, max: usize) -> Result<String, String> {
    let text = required(field, value)?;
    if text.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(text)
}

fn non_negative(field: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        return Err(format!("{field} must be a number"));
    }
    if value < 0.0 {
        return Err(format!("{field} must not be negative"));
    }
    Ok(value)
}

fn amount(field: &str, input: &AmountInput) -> Result<f64, String> {
    let value = match input {
        AmountInput::Number(n) => *n,
        AmountInput::Text(raw) => required(field, raw)?
            .parse::<f64>()
            .map_err(|_| format!("{field} must be a number"))?,
    };
    non_negative(field, value)
}

fn four_digit_year(value: &str) -> Result<String, String> {
    let year = required("year", value)?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err("year must be a four-digit year".into());
    }
    Ok(year)
}

/// Check and normalise the fields a partial update sets, with the same rules
/// as a new submission. `netPay` is taken as given.
pub fn validate_patch(patch: &PayslipPatch) -> Result<PayslipPatch, String> {
    Ok(PayslipPatch {
        employee_name: patch
            .employee_name
            .as_deref()
            .map(|v| bounded_text("employeeName", v, MAX_EMPLOYEE_NAME_LEN))
            .transpose()?,
        employee_id: patch
            .employee_id
            .as_deref()
            .map(|v| bounded_text("employeeId", v, MAX_EMPLOYEE_ID_LEN))
            .transpose()?,
        salary: patch.salary.map(|v| non_negative("salary", v)).transpose()?,
        deductions: patch
            .deductions
            .map(|v| non_negative("deductions", v))
            .transpose()?,
        tax_amount: patch
            .tax_amount
            .map(|v| non_negative("taxAmount", v))
            .transpose()?,
        year: patch.year.as_deref().map(four_digit_year).transpose()?,
        ..patch.clone()
    })
}

impl PayslipForm {
    /// Validate every field and derive net pay from the submitted amounts.
    pub fn parse(&self) -> Result<NewPayslip, String> {
        let employee_name =
            bounded_text("employeeName", &self.employee_name, MAX_EMPLOYEE_NAME_LEN)?;
        let employee_id = bounded_text("employeeId", &self.employee_id, MAX_EMPLOYEE_ID_LEN)?;
        let salary = amount("salary", &self.salary)?;
        let deductions = amount("deductions", &self.deductions)?;
        let tax_amount = amount("taxAmount", &self.tax_amount)?;

        let month = Month::try_from(required("month", &self.month)?)
            .map_err(|_| "month must be a calendar month name".to_string())?;

        let year = four_digit_year(&self.year)?;

        let payment_date =
            NaiveDate::parse_from_str(&required("paymentDate", &self.payment_date)?, "%Y-%m-%d")
                .map_err(|_| "paymentDate must be a YYYY-MM-DD date".to_string())?;

        Ok(NewPayslip {
            employee_name,
            employee_id,
            salary,
            deductions,
            tax_amount,
            net_pay: net_pay(salary, deductions, tax_amount),
            month,
            year,
            payment_date,
        })
    }
}
