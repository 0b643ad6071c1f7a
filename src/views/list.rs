use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::{format_money, search};
use crate::model::Payslip;

pub const EMPTY_MESSAGE: &str = "No payslips found. Add your first payslip!";
pub const NO_MATCH_MESSAGE: &str = "No payslips match your search";

/// One table row of the payslip list.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipRow {
    pub id: String,
    #[schema(example = "Jane Doe")]
    pub employee_name: String,
    #[schema(example = "EMP007")]
    pub employee_id: String,
    #[schema(example = "March 2024")]
    pub period: String,
    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub payment_date: NaiveDate,
    #[schema(example = "$4500.00")]
    pub net_pay: String,
}

impl From<&Payslip> for PayslipRow {
    fn from(p: &Payslip) -> Self {
        Self {
            id: p.id.clone(),
            employee_name: p.employee_name.clone(),
            employee_id: p.employee_id.clone(),
            period: format!("{} {}", p.month, p.year),
            payment_date: p.payment_date,
            net_pay: format_money(p.net_pay),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipListView {
    pub payslips: Vec<PayslipRow>,
    pub search: Option<String>,
    /// Empty-state text, present only when there are no rows.
    pub message: Option<String>,
}

impl PayslipListView {
    pub fn build(records: &[Payslip], search_term: Option<&str>) -> Self {
        let term = search_term.map(str::trim).filter(|t| !t.is_empty());
        let payslips: Vec<PayslipRow> = match term {
            Some(t) => search::filter(records, t).into_iter().map(PayslipRow::from).collect(),
            None => records.iter().map(PayslipRow::from).collect(),
        };

        let message = match (payslips.is_empty(), term) {
            (false, _) => None,
            (true, Some(_)) => Some(NO_MATCH_MESSAGE.to_string()),
            (true, None) => Some(EMPTY_MESSAGE.to_string()),
        };

        Self {
            payslips,
            search: term.map(str::to_string),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Month, NewPayslip};
    use chrono::Utc;

    fn jane() -> Payslip {
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
        .into_record("p1".into(), "u1".into(), Utc::now())
    }

    #[test]
    fn rows_show_period_and_formatted_net_pay() {
        let view = PayslipListView::build(&[jane()], None);
        assert_eq!(view.payslips.len(), 1);
        assert_eq!(view.payslips[0].period, "March 2024");
        assert_eq!(view.payslips[0].net_pay, "$4500.00");
        assert!(view.message.is_none());
    }

    #[test]
    fn empty_states_depend_on_search() {
        assert_eq!(
            PayslipListView::build(&[], None).message.as_deref(),
            Some(EMPTY_MESSAGE)
        );
        assert_eq!(
            PayslipListView::build(&[], Some("   ")).message.as_deref(),
            Some(EMPTY_MESSAGE)
        );
        assert_eq!(
            PayslipListView::build(&[jane()], Some("2023")).message.as_deref(),
            Some(NO_MATCH_MESSAGE)
        );
    }
}
