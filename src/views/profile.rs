use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Session;
use crate::model::PayslipFile;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub user_id: String,
    pub files: Vec<PayslipFile>,
}

impl ProfileView {
    pub fn build(session: &Session, files: Vec<PayslipFile>) -> Self {
        Self {
            email: session.email.clone(),
            user_id: session.user_id.clone(),
            files,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub const PASSWORD_CHANGED_MESSAGE: &str = "Your password has been changed successfully.";

impl PasswordChangeForm {
    /// Checks the form only. No credential is changed anywhere.
    pub fn accept(&self) -> Result<&'static str, String> {
        if self.old_password.is_empty()
            || self.new_password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err("All password fields are required".into());
        }
        if self.new_password != self.confirm_password {
            return Err("New password and confirm password must match.".into());
        }
        Ok(PASSWORD_CHANGED_MESSAGE)
    }
}
