pub mod dashboard;
pub mod files;
pub mod payslip;
pub mod profile;
