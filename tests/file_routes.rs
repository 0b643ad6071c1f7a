#[macro_use]
mod common;

use actix_web::{http::StatusCode, http::header, test};
use common::bearer;
use serde_json::Value;

#[actix_web::test]
async fn upload_list_download_and_delete_a_file() {
    let app = spawn_app!();
    let token = register!(app, "jane@example.com");

    let req = test::TestRequest::post()
        .uri("/api/files?name=march-2024.pdf")
        .insert_header(bearer(&token))
        .insert_header((header::CONTENT_TYPE, "application/pdf"))
        .set_payload("%PDF-1.7 payslip")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let file: Value = test::read_body_json(resp).await;
    assert_eq!(file["name"], "march-2024.pdf");
    assert_eq!(file["contentType"], "application/pdf");
    assert_eq!(file["size"], 16);
    let id = file["id"].as_str().unwrap().to_string();
    let url = file["url"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/files")
        .insert_header(bearer(&token))
        .to_request();
    let files: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(files.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/files/{id}/download"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "application/pdf");
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"%PDF-1.7 payslip");

    // a url that does not match the record is refused
    let req = test::TestRequest::delete()
        .uri(&format!("/api/files/{id}?url=memory://blobs/elsewhere"))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/files/{id}?url={}", urlencode(&url)))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/files")
        .insert_header(bearer(&token))
        .to_request();
    let files: Value = test::call_and_read_body_json(&app, req).await;
    assert!(files.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn files_are_private_to_their_owner() {
    let app = spawn_app!();
    let alice = register!(app, "alice@example.com");
    let bob = register!(app, "bob@example.com");

    let req = test::TestRequest::post()
        .uri("/api/files?name=a.pdf")
        .insert_header(bearer(&alice))
        .set_payload("alice only")
        .to_request();
    let file: Value = test::call_and_read_body_json(&app, req).await;
    let id = file["id"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/files/{id}/download"))
        .insert_header(bearer(&bob))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/files")
        .insert_header(bearer(&bob))
        .to_request();
    let files: Value = test::call_and_read_body_json(&app, req).await;
    assert!(files.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn upload_without_usable_name_is_rejected() {
    let app = spawn_app!();
    let token = register!(app, "jane@example.com");

    let req = test::TestRequest::post()
        .uri("/api/files?name=..")
        .insert_header(bearer(&token))
        .set_payload("data")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn same_name_uploads_do_not_share_content() {
    let app = spawn_app!();
    let token = register!(app, "twice@example.com");

    let upload = |body: &'static str| {
        test::TestRequest::post()
            .uri("/api/files?name=march.pdf")
            .insert_header(bearer(&token))
            .set_payload(body)
            .to_request()
    };
    let first: Value = test::call_and_read_body_json(&app, upload("FIRST")).await;
    let second: Value = test::call_and_read_body_json(&app, upload("SECOND")).await;
    assert_ne!(first["url"], second["url"]);

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/api/files/{}?url={}",
            second["id"].as_str().unwrap(),
            urlencode(second["url"].as_str().unwrap())
        ))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/files/{}/download", first["id"].as_str().unwrap()))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&test::read_body(resp).await[..], b"FIRST");
}

#[actix_web::test]
async fn control_characters_are_dropped_from_file_names() {
    let app = spawn_app!();
    let token = register!(app, "ctrl@example.com");

    let req = test::TestRequest::post()
        .uri("/api/files?name=march%0A.pdf")
        .insert_header(bearer(&token))
        .set_payload("data")
        .to_request();
    let file: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(file["name"], "march.pdf");

    let req = test::TestRequest::get()
        .uri(&format!("/api/files/{}/download", file["id"].as_str().unwrap()))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"march.pdf\""
    );
}

fn urlencode(raw: &str) -> String {
    raw.replace('%', "%25")
        .replace(':', "%3A")
        .replace('/', "%2F")
}
