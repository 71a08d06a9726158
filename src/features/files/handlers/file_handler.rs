use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    DownloadBatchRequestDto, FileRecordDto, UploadFormDto, UploadResponseDto,
};
use crate::features::files::services::{FileService, UploadedFile};
use crate::shared::constants::{DEFAULT_CONTENT_TYPE, UPLOAD_FIELD_NAME};
use crate::shared::types::{ApiResponse, Meta};

/// Upload one or more files
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFormDto,
        content_type = "multipart/form-data",
        description = "One or more files under the `file` field",
    ),
    responses(
        (status = 201, description = "Files ingested", body = ApiResponse<UploadResponseDto>),
        (status = 400, description = "Empty or malformed upload"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadResponseDto>>), AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Validation("Filename is required".to_string()))?;
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
            .to_vec();

        files.push(UploadedFile {
            filename,
            content_type,
            data,
        });
    }

    let records = service.upload(user.sub, files).await?;
    let files: Vec<FileRecordDto> = records.into_iter().map(FileRecordDto::from).collect();

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(UploadResponseDto { files }),
            None,
            None,
        )),
    ))
}

/// List the caller's files in upload order
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "All files", body = ApiResponse<Vec<FileRecordDto>>),
        (status = 401, description = "Authentication required"),
        (status = 503, description = "Metadata store unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
) -> Result<Json<ApiResponse<Vec<FileRecordDto>>>, AppError> {
    let records = service.list(user.sub).await?;

    let total = records.len() as i64;
    let files: Vec<FileRecordDto> = records.into_iter().map(FileRecordDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

/// Delete one file by its stored filename
#[utoipa::path(
    delete,
    path = "/api/files/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "File deleted"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "No such file")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(filename): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    service.delete(user.sub, &filename).await?;

    Ok(Json(ApiResponse::success(
        None,
        Some(format!("File '{}' deleted", filename)),
        None,
    )))
}

/// Download one file's content
#[utoipa::path(
    get,
    path = "/api/files/{filename}/download",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "No such file")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let file = service.download(user.sub, &filename).await?;

    let headers = attachment_headers(&file.filename, &file.content_type)?;
    Ok((headers, file.data))
}

/// Download several files as one ZIP archive
#[utoipa::path(
    post,
    path = "/api/files/download-batch",
    tag = "files",
    request_body = DownloadBatchRequestDto,
    responses(
        (status = 200, description = "ZIP archive of the requested files"),
        (status = 400, description = "Empty filename list"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "A requested file does not exist")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_batch(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppJson(dto): AppJson<DownloadBatchRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let archive = service.download_batch(user.sub, &dto.filenames).await?;

    let headers = attachment_headers("files.zip", "application/zip")?;
    Ok((headers, archive))
}

fn attachment_headers(filename: &str, content_type: &str) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );

    // RFC 5987 encoding keeps non-ASCII filenames intact
    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::Internal(format!("Invalid filename header: {}", e)))?,
    );

    Ok(headers)
}
