use serde::Serialize;
use utoipa::ToSchema;

use super::format_money;
use super::list::{EMPTY_MESSAGE, PayslipRow};
use crate::model::Payslip;

const RECENT_LIMIT: usize = 3;

/// Dashboard summary over every record the user owns.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub count: usize,
    #[schema(example = "1 payslip")]
    pub count_label: String,
    pub total_net_pay: f64,
    pub average_net_pay: f64,
    #[schema(example = "$4500.00")]
    pub total_net_pay_display: String,
    #[schema(example = "$4500.00")]
    pub average_net_pay_display: String,
    /// Up to three records, latest payment date first.
    pub recent: Vec<PayslipRow>,
    pub message: Option<String>,
}

impl DashboardView {
    pub fn build(records: &[Payslip]) -> Self {
        let count = records.len();
        let total: f64 = records.iter().map(|p| p.net_pay).sum();
        let average = if count > 0 { total / count as f64 } else { 0.0 };

        let mut by_payment: Vec<&Payslip> = records.iter().collect();
        by_payment.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        let recent: Vec<PayslipRow> = by_payment
            .into_iter()
            .take(RECENT_LIMIT)
            .map(PayslipRow::from)
            .collect();

        Self {
            count,
            count_label: if count == 1 {
                "1 payslip".to_string()
            } else {
                format!("{count} payslips")
            },
            total_net_pay: total,
            average_net_pay: average,
            total_net_pay_display: format_money(total),
            average_net_pay_display: format_money(average),
            message: recent.is_empty().then(|| EMPTY_MESSAGE.to_string()),
            recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Month, NewPayslip};
    use chrono::{NaiveDate, Utc};

    fn payslip(id: &str, net_pay: f64, paid: (i32, u32, u32)) -> Payslip {
        NewPayslip {
            employee_name: "Jane Doe".into(),
            employee_id: "EMP007".into(),
            salary: net_pay,
            deductions: 0.0,
            tax_amount: 0.0,
            net_pay,
            month: Month::March,
            year: "2024".into(),
            payment_date: NaiveDate::from_ymd_opt(paid.0, paid.1, paid.2).unwrap(),
        }
        .into_record(id.into(), "u1".into(), Utc::now())
    }

    #[test]
    fn aggregates_count_total_and_average() {
        let records = vec![
            payslip("a", 1000.0, (2024, 1, 31)),
            payslip("b", 2000.0, (2024, 2, 29)),
            payslip("c", 3000.0, (2024, 3, 31)),
            payslip("d", 4000.0, (2023, 12, 31)),
        ];
        let view = DashboardView::build(&records);

        assert_eq!(view.count, 4);
        assert_eq!(view.count_label, "4 payslips");
        assert_eq!(view.total_net_pay_display, "$10000.00");
        assert_eq!(view.average_net_pay_display, "$2500.00");
        let recent: Vec<&str> = view.recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(recent, vec!["c", "b", "a"]);
        assert!(view.message.is_none());
    }

    #[test]
    fn empty_dashboard_has_zero_average() {
        let view = DashboardView::build(&[]);
        assert_eq!(view.count_label, "0 payslips");
        assert_eq!(view.average_net_pay_display, "$0.00");
        assert_eq!(view.message.as_deref(), Some(EMPTY_MESSAGE));
    }

    #[test]
    fn single_record_label() {
        let view = DashboardView::build(&[payslip("a", 4500.0, (2024, 3, 1))]);
        assert_eq!(view.count_label, "1 payslip");
        assert_eq!(view.total_net_pay_display, "$4500.00");
    }
}
