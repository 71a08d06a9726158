use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::FileRecordDto;
use crate::features::search::dtos::{KeywordStatDto, SearchParamsDto};
use crate::features::search::services::SearchService;
use crate::shared::types::{ApiResponse, Meta};

/// Search the caller's files by filename or keyword
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "search",
    params(SearchParamsDto),
    responses(
        (status = 200, description = "Matching files", body = ApiResponse<Vec<FileRecordDto>>),
        (status = 400, description = "Empty query"),
        (status = 401, description = "Authentication required"),
        (status = 503, description = "Metadata store unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn search(
    user: AuthenticatedUser,
    State(service): State<Arc<SearchService>>,
    Query(params): Query<SearchParamsDto>,
) -> Result<Json<ApiResponse<Vec<FileRecordDto>>>, AppError> {
    let category = params.category.unwrap_or_default();
    let records = service.search(user.sub, &params.q, category).await?;

    let total = records.len() as i64;
    let files: Vec<FileRecordDto> = records.into_iter().map(FileRecordDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

/// Most frequent keywords across the caller's files
#[utoipa::path(
    get,
    path = "/api/keywords/frequent",
    tag = "search",
    responses(
        (status = 200, description = "Keyword frequencies", body = ApiResponse<Vec<KeywordStatDto>>),
        (status = 401, description = "Authentication required"),
        (status = 503, description = "Metadata store unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn frequent_keywords(
    user: AuthenticatedUser,
    State(service): State<Arc<SearchService>>,
) -> Result<Json<ApiResponse<Vec<KeywordStatDto>>>, AppError> {
    let stats = service.frequent_keywords(user.sub).await?;

    let total = stats.len() as i64;
    let keywords: Vec<KeywordStatDto> = stats.into_iter().map(KeywordStatDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(keywords),
        None,
        Some(Meta { total }),
    )))
}
