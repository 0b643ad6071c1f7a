use crate::model::{Month, Payslip, PayslipFile, PayslipPatch};
use crate::models::{LoginReqDto, LoginResponse, RefreshReq, RegisterReq};
use crate::views::dashboard::DashboardView;
use crate::views::form::{AmountInput, PayslipForm};
use crate::views::list::{PayslipListView, PayslipRow};
use crate::views::profile::{PasswordChangeForm, ProfileView};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PaySlip Harmony API",
        version = "1.0.0",
        description = r#"
## PaySlip Harmony

Personal payslip records for signed-in users.

### Features
- **Accounts**: register, sign in, refresh and sign out
- **Payslips**: add, list, search, update and delete your own records
- **Dashboard**: totals, averages and the most recent payments
- **Files**: upload, download and delete payslip documents

### Security
Everything under `/api` requires a **JWT Bearer** access token.
Unauthenticated requests get `401` with a `redirect` to `/auth/login`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::dashboard::dashboard,

        crate::api::payslip::create_payslip,
        crate::api::payslip::list_payslips,
        crate::api::payslip::update_payslip,
        crate::api::payslip::delete_payslip,

        crate::api::files::upload_file,
        crate::api::files::list_files,
        crate::api::files::download_file,
        crate::api::files::delete_file,

        crate::api::profile::get_profile,
        crate::api::profile::change_password
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            RefreshReq,
            LoginResponse,
            Month,
            Payslip,
            PayslipPatch,
            PayslipFile,
            AmountInput,
            PayslipForm,
            PayslipRow,
            PayslipListView,
            DashboardView,
            ProfileView,
            PasswordChangeForm
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Account and session APIs"),
        (name = "Dashboard", description = "Payslip summary"),
        (name = "Payslips", description = "Payslip record APIs"),
        (name = "Files", description = "Payslip document APIs"),
        (name = "Profile", description = "Account profile APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
