pub mod month;
pub mod payslip;
pub mod payslip_file;
pub mod user;

pub use month::Month;
pub use payslip::{NewPayslip, Payslip, PayslipPatch};
pub use payslip_file::{NewPayslipFile, PayslipFile};
pub use user::User;
