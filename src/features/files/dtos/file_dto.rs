use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::files::models::FileRecord;

/// Multipart form for the upload endpoint; the `file` field may repeat
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadFormDto {
    /// The file(s) to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Public view of one uploaded file's metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileRecordDto {
    pub id: Uuid,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub public_url: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FileRecord> for FileRecordDto {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            original_filename: record.original_filename,
            content_type: record.content_type,
            file_size: record.file_size,
            public_url: record.public_url,
            keywords: record.keywords,
            summary: record.summary,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponseDto {
    pub files: Vec<FileRecordDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DownloadBatchRequestDto {
    #[validate(length(min = 1, message = "At least one filename is required"))]
    pub filenames: Vec<String>,
}
