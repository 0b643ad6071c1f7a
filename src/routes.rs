use crate::{
    api::{dashboard, files, payslip, profile},
    auth::{
        handlers,
        middleware::{LOGIN_ROUTE, auth_middleware, bearer_token},
    },
    config::Config,
    state::AppState,
};
use actix_web::{HttpRequest, HttpResponse, Responder, http::header, middleware::from_fn, web};

/// Landing route: signed-in visitors go to the dashboard, everyone else to
/// the login route.
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    config: web::Data<Config>,
) -> impl Responder {
    let signed_in = bearer_token(&req)
        .ok()
        .is_some_and(|token| state.identity.verify(token).is_ok());

    let target = if signed_in {
        format!("{}/dashboard", config.api_prefix)
    } else {
        LOGIN_ROUTE.to_string()
    };

    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, target))
        .finish()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.app_data(web::Data::new(config.clone()))
        .service(web::resource("/").route(web::get().to(index)));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(web::resource("/login").route(web::post().to(handlers::login)))
            .service(web::resource("/register").route(web::post().to(handlers::register)))
            .service(web::resource("/refresh").route(web::post().to(handlers::refresh_token)))
            .service(web::resource("/logout").route(web::post().to(handlers::logout))),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard)))
            .service(
                web::scope("/payslips")
                    // /payslips
                    .service(
                        web::resource("")
                            .route(web::get().to(payslip::list_payslips))
                            .route(web::post().to(payslip::create_payslip)),
                    )
                    // /payslips/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::patch().to(payslip::update_payslip))
                            .route(web::delete().to(payslip::delete_payslip)),
                    ),
            )
            .service(
                web::scope("/files")
                    .app_data(web::PayloadConfig::new(config.max_upload_bytes))
                    // /files
                    .service(
                        web::resource("")
                            .route(web::get().to(files::list_files))
                            .route(web::post().to(files::upload_file)),
                    )
                    // /files/{id}
                    .service(web::resource("/{id}").route(web::delete().to(files::delete_file)))
                    // /files/{id}/download
                    .service(
                        web::resource("/{id}/download").route(web::get().to(files::download_file)),
                    ),
            )
            .service(
                web::scope("/profile")
                    .service(web::resource("").route(web::get().to(profile::get_profile)))
                    .service(
                        web::resource("/password").route(web::post().to(profile::change_password)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days, rotated on every refresh)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns a new token pair, old refresh token revoked
