use actix_web::{HttpResponse, Responder, web};
use tracing::{info, instrument};

use crate::{
    auth::provider::SignedIn,
    error::ApiError,
    models::{LoginReqDto, LoginResponse, RefreshReq, RegisterReq},
    state::AppState,
};

fn login_response(signed_in: SignedIn) -> LoginResponse {
    LoginResponse {
        user_id: signed_in.session.user_id,
        email: signed_in.session.email,
        access_token: signed_in.tokens.access_token,
        refresh_token: signed_in.tokens.refresh_token,
    }
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 201, body = LoginResponse),
        (status = 400, description = "invalid-email or weak-password"),
        (status = 409, description = "email-already-in-use")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_register", skip(state, user), fields(email = %user.email))]
pub async fn register(
    user: web::Json<RegisterReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let signed_in = state
        .identity
        .register(&user.email, &user.password)
        .await
        .map_err(|e| ApiError::from_auth("Failed to register", e))?;

    info!(user_id = %signed_in.session.user_id, "Registration successful");
    Ok(HttpResponse::Created().json(login_response(signed_in)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "invalid-credential")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(state, user), fields(email = %user.email))]
pub async fn login(
    user: web::Json<LoginReqDto>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    info!("Login request received");

    let signed_in = state
        .identity
        .sign_in(&user.email, &user.password)
        .await
        .map_err(|e| ApiError::from_auth("Failed to sign in", e))?;

    info!(user_id = %signed_in.session.user_id, "Login successful");
    Ok(HttpResponse::Ok().json(login_response(signed_in)))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshReq,
    responses(
        (status = 200, body = LoginResponse),
        (status = 401)
    ),
    tag = "Auth"
)]
pub async fn refresh_token(
    body: web::Json<RefreshReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let signed_in = state
        .identity
        .refresh(&body.refresh_token)
        .await
        .map_err(|e| ApiError::from_auth("Failed to refresh session", e))?;

    Ok(HttpResponse::Ok().json(login_response(signed_in)))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = RefreshReq,
    responses((status = 204)),
    tag = "Auth"
)]
pub async fn logout(
    body: web::Json<RefreshReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    state
        .identity
        .sign_out(&body.refresh_token)
        .await
        .map_err(|e| ApiError::from_auth("Failed to sign out", e))?;

    Ok(HttpResponse::NoContent().finish())
}
