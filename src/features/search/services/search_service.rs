use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::files::models::FileRecord;
use crate::features::search::matcher::{
    aggregate_keywords, filter_by_category, search_records, Category, KeywordStat, SearchQuery,
};

/// Read-side service: searches and aggregates over one owner's records.
///
/// Both operations fetch a consistent snapshot and run the pure matcher
/// functions over it, so results are deterministic for an unchanged set.
pub struct SearchService {
    pool: PgPool,
    keyword_top_n: usize,
}

impl SearchService {
    pub fn new(pool: PgPool, keyword_top_n: usize) -> Self {
        Self {
            pool,
            keyword_top_n,
        }
    }

    /// Fetch the owner's full record set in a stable order
    async fn snapshot(&self, owner_id: Uuid) -> Result<Vec<FileRecord>> {
        let records = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, owner_id, file_key, original_filename, content_type,
                   file_size, public_url, keywords, summary, created_at
            FROM file_records
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Case-insensitive substring search, optionally narrowed by category.
    /// An empty result is a normal outcome, not an error.
    pub async fn search(
        &self,
        owner_id: Uuid,
        raw_query: &str,
        category: Category,
    ) -> Result<Vec<FileRecord>> {
        let query = SearchQuery::parse(raw_query)?;
        let snapshot = self.snapshot(owner_id).await?;

        let hits = search_records(&snapshot, &query);
        Ok(filter_by_category(&hits, category))
    }

    /// Most frequent keywords across the owner's records, recomputed
    /// on demand from current data.
    pub async fn frequent_keywords(&self, owner_id: Uuid) -> Result<Vec<KeywordStat>> {
        let snapshot = self.snapshot(owner_id).await?;
        Ok(aggregate_keywords(&snapshot, self.keyword_top_n))
    }
}
