//! What each page shows, computed from already-fetched records.

pub mod dashboard;
pub mod form;
pub mod list;
pub mod profile;
pub mod search;

/// Dollar amount with two decimals, e.g. `$4500.00`.
pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::format_money;

    #[test]
    fn formats_two_decimals_with_dollar_sign() {
        assert_eq!(format_money(4500.0), "$4500.00");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1234.567), "$1234.57");
        assert_eq!(format_money(-50.0), "$-50.00");
    }
}
