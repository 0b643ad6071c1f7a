use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::debug;

use crate::{
    auth::Session,
    error::ApiError,
    state::AppState,
    views::profile::{PasswordChangeForm, ProfileView},
};

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, body = ProfileView),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    session: Session,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let files = state
        .files
        .list_for_current_user(Some(&session))
        .await
        .map_err(|e| ApiError::from_repo("Failed to fetch files", e))?;

    Ok(HttpResponse::Ok().json(ProfileView::build(&session, files)))
}

/// Placeholder: validates the form and reports success without changing
/// any credential.
#[utoipa::path(
    post,
    path = "/api/profile/password",
    request_body = PasswordChangeForm,
    responses(
        (status = 200, description = "Form accepted"),
        (status = 400, description = "Passwords do not match")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn change_password(
    session: Session,
    body: web::Json<PasswordChangeForm>,
) -> Result<impl Responder, ApiError> {
    let message = body.accept().map_err(ApiError::BadRequest)?;
    debug!(user_id = %session.user_id, "Password change form accepted, no credential updated");

    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}
