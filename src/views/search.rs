use crate::model::Payslip;

/// Case-insensitive substring match on employee name, employee id, month
/// and year. An empty term matches everything.
pub fn matches(payslip: &Payslip, term: &str) -> bool {
    let term = term.to_lowercase();
    [
        payslip.employee_name.to_lowercase(),
        payslip.employee_id.to_lowercase(),
        payslip.month.to_string().to_lowercase(),
        payslip.year.to_lowercase(),
    ]
    .iter()
    .any(|field| field.contains(&term))
}

/// Filter an already-fetched list, keeping its order.
pub fn filter<'a>(payslips: &'a [Payslip], term: &str) -> Vec<&'a Payslip> {
    payslips.iter().filter(|p| matches(p, term)).collect()
}
