use actix_web::{HttpRequest, HttpResponse, Responder, http::header, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::{
    auth::Session,
    error::ApiError,
    model::PayslipFile,
    repo::Upload,
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadQuery {
    /// Original file name
    #[param(example = "march-2024.pdf")]
    pub name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteFileQuery {
    /// Storage address recorded for the file
    pub url: String,
}

#[utoipa::path(
    post,
    path = "/api/files",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, body = PayslipFile),
        (status = 400, description = "Missing file name"),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Files"
)]
pub async fn upload_file(
    session: Session,
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<impl Responder, ApiError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let upload = Upload {
        name: query.into_inner().name,
        content_type,
        bytes: body,
    };

    let file = state
        .files
        .upload(Some(&session), upload)
        .await
        .map_err(|e| ApiError::from_repo("Failed to upload file", e))?;

    Ok(HttpResponse::Created().json(file))
}

#[utoipa::path(
    get,
    path = "/api/files",
    responses(
        (status = 200, body = Vec<PayslipFile>),
        (status = 401)
    ),
    security(("bearer_auth" = [])),
    tag = "Files"
)]
pub async fn list_files(
    session: Session,
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    let files = state
        .files
        .list_for_current_user(Some(&session))
        .await
        .map_err(|e| ApiError::from_repo("Failed to fetch files", e))?;

    Ok(HttpResponse::Ok().json(files))
}

#[utoipa::path(
    get,
    path = "/api/files/{file_id}/download",
    params(
        ("file_id", Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Files"
)]
pub async fn download_file(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let file_id = path.into_inner();

    let download = state
        .files
        .download(Some(&session), &file_id)
        .await
        .map_err(|e| ApiError::from_repo("Failed to download file", e))?;

    Ok(HttpResponse::Ok()
        .content_type(download.file.content_type.as_str())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download.file.name.replace('"', "")),
        ))
        .body(download.bytes))
}

#[utoipa::path(
    delete,
    path = "/api/files/{file_id}",
    params(
        ("file_id", Path, description = "File ID"),
        DeleteFileQuery
    ),
    responses(
        (status = 200, description = "File deleted"),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Files"
)]
pub async fn delete_file(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<DeleteFileQuery>,
) -> Result<impl Responder, ApiError> {
    let file_id = path.into_inner();

    state
        .files
        .delete(Some(&session), &file_id, &query.url)
        .await
        .map_err(|e| ApiError::from_repo("Failed to delete file", e))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "File deleted successfully!"
    })))
}
