use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

use crate::auth::session::Session;
use crate::state::AppState;

/// Where unauthenticated visitors are sent.
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Pull the bearer token out of the Authorization header.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, &'static str> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or("Missing Authorization header")?;
    let value = header
        .to_str()
        .map_err(|_| "Invalid Authorization header encoding")?;
    value
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must start with Bearer")
}

fn unauthorized(req: ServiceRequest, body: serde_json::Value) -> ServiceResponse<BoxBody> {
    let resp = HttpResponse::Unauthorized().json(body);
    req.into_response(resp.map_into_boxed_body())
}

/// Route guard: requests without a valid access token never reach a handler.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let state = req
        .app_data::<Data<AppState>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App state missing"))?;

    let token = match bearer_token(req.request()) {
        Ok(t) => t.to_string(),
        Err(reason) => {
            return Ok(unauthorized(
                req,
                json!({"error": reason, "redirect": LOGIN_ROUTE}),
            ));
        }
    };

    let session: Session = match state.identity.verify(&token) {
        Ok(s) => s,
        Err(e) => {
            return Ok(unauthorized(
                req,
                json!({
                    "error": "Invalid or expired token",
                    "details": e.to_string(),
                    "redirect": LOGIN_ROUTE
                }),
            ));
        }
    };

    tracing::debug!(user_id = %session.user_id, "Request authenticated");
    req.extensions_mut().insert(session);

    next.call(req).await
}
