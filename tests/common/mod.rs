#![allow(dead_code)]

use actix_web::web::Data;
use payslip_harmony::{
    auth::TokenSettings,
    config::{Config, StorageBackend},
    state::AppState,
};
use serde_json::{Value, json};

pub fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".into(),
        storage_backend: StorageBackend::Memory,
        database_url: None,
        jwt_secret: "integration-secret".into(),
        access_token_ttl: 900,
        refresh_token_ttl: 3600,
        api_prefix: "/api".into(),
        blob_root: "unused".into(),
        blob_public_url: "memory://blobs".into(),
        max_upload_bytes: 64 * 1024,
        log_dir: "logs".into(),
    }
}

pub fn test_state(config: &Config) -> Data<AppState> {
    Data::new(AppState::in_memory(TokenSettings {
        secret: config.jwt_secret.clone(),
        access_ttl: config.access_token_ttl,
        refresh_ttl: config.refresh_token_ttl,
    }))
}

/// Build the full application over in-memory storage.
macro_rules! spawn_app {
    () => {{
        let config = common::test_config();
        let state = common::test_state(&config);
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data(state)
                .configure(|cfg| payslip_harmony::routes::configure(cfg, &config)),
        )
        .await
    }};
}

/// Register `email` and return the access token.
macro_rules! register {
    ($app:expr, $email:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/auth/register")
            .set_json(serde_json::json!({"email": $email, "password": "s3cret!pw"}))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        body["access_token"].as_str().unwrap().to_string()
    }};
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub fn jane_doe() -> Value {
    json!({
        "employeeName": "Jane Doe",
        "employeeId": "EMP007",
        "salary": 6000,
        "deductions": 600,
        "taxAmount": 900,
        "month": "March",
        "year": "2024",
        "paymentDate": "2024-03-01"
    })
}

pub fn payslip(name: &str, id: &str, month: &str, year: &str, date: &str, salary: f64) -> Value {
    json!({
        "employeeName": name,
        "employeeId": id,
        "salary": salary,
        "deductions": 0,
        "taxAmount": 0,
        "month": month,
        "year": year,
        "paymentDate": date
    })
}
