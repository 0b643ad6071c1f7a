//! Record and file access, scoped to an explicitly passed session.

pub mod files;
pub mod payslips;

pub use files::{Download, FileRepository, Upload};
pub use payslips::PayslipRepository;

use crate::auth::Session;
use crate::error::RepoError;

/// Fail fast, before any store call, when nobody is signed in.
pub(crate) fn require_session(session: Option<&Session>) -> Result<&Session, RepoError> {
    session.ok_or(RepoError::Unauthenticated)
}
