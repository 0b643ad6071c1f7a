use actix_web::{HttpResponse, Responder, web};

use crate::{auth::Session, error::ApiError, state::AppState, views::dashboard::DashboardView};

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, body = DashboardView),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard(
    session: Session,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let records = state
        .payslips
        .list_for_current_user(Some(&session))
        .await
        .map_err(|e| ApiError::from_repo("Failed to fetch payslips", e))?;

    Ok(HttpResponse::Ok().json(DashboardView::build(&records)))
}
