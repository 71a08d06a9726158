use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::search::{dtos as search_dtos, handlers as search_handlers, matcher};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Files
        files_handlers::upload,
        files_handlers::list,
        files_handlers::delete,
        files_handlers::download,
        files_handlers::download_batch,
        // Search
        search_handlers::search,
        search_handlers::frequent_keywords,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthUserDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Files
            files_dtos::UploadFormDto,
            files_dtos::FileRecordDto,
            files_dtos::UploadResponseDto,
            files_dtos::DownloadBatchRequestDto,
            ApiResponse<files_dtos::UploadResponseDto>,
            ApiResponse<Vec<files_dtos::FileRecordDto>>,
            // Search
            matcher::Category,
            search_dtos::KeywordStatDto,
            ApiResponse<Vec<search_dtos::KeywordStatDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "files", description = "File upload, download, and deletion"),
        (name = "search", description = "Search and keyword aggregation"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Content Orchestration API",
        version = "0.1.0",
        description = "File upload, enrichment, and metadata search service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
