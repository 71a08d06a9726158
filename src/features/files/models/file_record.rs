use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata record for one uploaded file.
///
/// Created on upload completion, after enrichment; deleted on explicit
/// user delete; immutable otherwise. Keywords are stored normalized
/// (trimmed, lowercased) so aggregation and ingestion agree.
#[derive(Debug, Clone, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub file_key: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub public_url: String,
    pub keywords: Vec<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}
