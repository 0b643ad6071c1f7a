use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::{
    auth::Session,
    error::ApiError,
    model::{Payslip, PayslipPatch},
    state::AppState,
    views::{
        form::{PayslipForm, validate_patch},
        list::PayslipListView,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PayslipQuery {
    /// Case-insensitive filter on employee name, employee id, month or year
    #[param(example = "jan")]
    pub search: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/payslips",
    request_body = PayslipForm,
    responses(
        (status = 201, description = "Payslip created", body = Payslip),
        (status = 400, description = "Form validation failed"),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Payslips"
)]
pub async fn create_payslip(
    session: Session,
    state: web::Data<AppState>,
    payload: web::Json<PayslipForm>,
) -> Result<impl Responder, ApiError> {
    let new_payslip = payload.parse().map_err(ApiError::BadRequest)?;

    let record = state
        .payslips
        .create(Some(&session), new_payslip)
        .await
        .map_err(|e| ApiError::from_repo("Failed to add payslip", e))?;

    Ok(HttpResponse::Created().json(record))
}

#[utoipa::path(
    get,
    path = "/api/payslips",
    params(PayslipQuery),
    responses(
        (status = 200, body = PayslipListView),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Payslips"
)]
pub async fn list_payslips(
    session: Session,
    state: web::Data<AppState>,
    query: web::Query<PayslipQuery>,
) -> Result<impl Responder, ApiError> {
    let records = state
        .payslips
        .list_for_current_user(Some(&session))
        .await
        .map_err(|e| ApiError::from_repo("Failed to fetch payslips", e))?;

    Ok(HttpResponse::Ok().json(PayslipListView::build(&records, query.search.as_deref())))
}

#[utoipa::path(
    patch,
    path = "/api/payslips/{payslip_id}",
    request_body = PayslipPatch,
    params(
        ("payslip_id", Path, description = "Payslip ID")
    ),
    responses(
        (status = 200, description = "Payslip updated", body = Payslip),
        (status = 400, description = "Empty patch or invalid field"),
        (status = 404, description = "Payslip not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payslips"
)]
pub async fn update_payslip(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PayslipPatch>,
) -> Result<impl Responder, ApiError> {
    let payslip_id = path.into_inner();
    let patch = validate_patch(&body).map_err(ApiError::BadRequest)?;

    let record = state
        .payslips
        .update(Some(&session), &payslip_id, &patch)
        .await
        .map_err(|e| ApiError::from_repo("Failed to update payslip", e))?;

    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    delete,
    path = "/api/payslips/{payslip_id}",
    params(
        ("payslip_id", Path, description = "Payslip ID")
    ),
    responses(
        (status = 200, description = "Payslip deleted"),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Payslips"
)]
pub async fn delete_payslip(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let payslip_id = path.into_inner();

    state
        .payslips
        .delete(Some(&session), &payslip_id)
        .await
        .map_err(|e| ApiError::from_repo("Failed to delete payslip", e))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Payslip deleted successfully!"
    })))
}
