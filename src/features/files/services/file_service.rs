use std::io::Write;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::core::error::{AppError, Result};
use crate::features::files::models::FileRecord;
use crate::features::search::matcher::normalize_keywords;
use crate::modules::enrichment::ContentEnricher;
use crate::modules::storage::{ContentCategory, MinIOClient};

/// One part extracted from the upload multipart body
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Content of one downloaded object, ready to stream back
pub struct DownloadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Write-side service for the ingestion and retrieval paths: object
/// storage, enrichment, and metadata persistence.
pub struct FileService {
    pool: PgPool,
    storage: Arc<MinIOClient>,
    enricher: Arc<dyn ContentEnricher>,
}

impl FileService {
    pub fn new(pool: PgPool, storage: Arc<MinIOClient>, enricher: Arc<dyn ContentEnricher>) -> Self {
        Self {
            pool,
            storage,
            enricher,
        }
    }

    /// Ingest a batch of uploaded files for one owner.
    ///
    /// Each file is stored under a category prefix derived from its MIME
    /// type, enriched, and persisted as a metadata record. A name that
    /// collides with an existing object is renamed to `name(n).ext`.
    pub async fn upload(
        &self,
        owner_id: Uuid,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<FileRecord>> {
        if files.is_empty() {
            return Err(AppError::Validation(
                "At least one file is required".to_string(),
            ));
        }

        let mut records = Vec::with_capacity(files.len());
        for file in files {
            records.push(self.ingest_one(owner_id, file).await?);
        }
        Ok(records)
    }

    async fn ingest_one(&self, owner_id: Uuid, file: UploadedFile) -> Result<FileRecord> {
        if file.filename.trim().is_empty() {
            return Err(AppError::Validation("Filename is required".to_string()));
        }

        let category = ContentCategory::from_content_type(&file.content_type);
        let filename = self
            .resolve_filename(owner_id, category, &file.filename)
            .await?;
        let key = self
            .storage
            .build_key(&owner_id.to_string(), category, &filename);

        let file_size = file.data.len() as i64;
        self.storage
            .upload(&key, file.data.clone(), &file.content_type)
            .await?;
        let public_url = self.storage.get_public_url(&key);

        // Enrichment is best-effort: a file without keywords is still
        // searchable by its filename.
        let (keywords, summary) = match self
            .enricher
            .enrich(&filename, &file.content_type, file.data)
            .await
        {
            Ok(result) => (normalize_keywords(&result.keywords), result.summary),
            Err(e) => {
                warn!("Enrichment failed for '{}': {}", filename, e);
                (Vec::new(), None)
            }
        };

        let record = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO file_records
                (owner_id, file_key, original_filename, content_type,
                 file_size, public_url, keywords, summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, owner_id, file_key, original_filename, content_type,
                      file_size, public_url, keywords, summary, created_at
            "#,
        )
        .bind(owner_id)
        .bind(&key)
        .bind(&filename)
        .bind(&file.content_type)
        .bind(file_size)
        .bind(&public_url)
        .bind(&keywords)
        .bind(&summary)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Ingested '{}' ({} bytes) for owner {}",
            filename, file_size, owner_id
        );
        Ok(record)
    }

    /// Resolve name collisions by appending a counter before the
    /// extension: `photo.png` becomes `photo(1).png`, then `photo(2).png`.
    async fn resolve_filename(
        &self,
        owner_id: Uuid,
        category: ContentCategory,
        filename: &str,
    ) -> Result<String> {
        let owner = owner_id.to_string();
        let key = self.storage.build_key(&owner, category, filename);
        if !self.storage.exists(&key).await? {
            return Ok(filename.to_string());
        }

        let (stem, ext) = split_filename(filename);

        let mut counter = 1;
        loop {
            let candidate = format!("{}({}){}", stem, counter, ext);
            let key = self.storage.build_key(&owner, category, &candidate);
            if !self.storage.exists(&key).await? {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    /// Full listing for the library view, in stable creation order
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<FileRecord>> {
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

    async fn find_by_filename(&self, owner_id: Uuid, filename: &str) -> Result<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, owner_id, file_key, original_filename, content_type,
                   file_size, public_url, keywords, summary, created_at
            FROM file_records
            WHERE owner_id = $1 AND original_filename = $2
            "#,
        )
        .bind(owner_id)
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File '{}' not found", filename)))
    }

    /// Delete one file by its stored filename: object first, then record
    pub async fn delete(&self, owner_id: Uuid, filename: &str) -> Result<()> {
        let record = self.find_by_filename(owner_id, filename).await?;

        self.storage.delete(&record.file_key).await?;

        sqlx::query("DELETE FROM file_records WHERE id = $1")
            .bind(record.id)
            .execute(&self.pool)
            .await?;

        info!("Deleted '{}' for owner {}", filename, owner_id);
        Ok(())
    }

    /// Fetch one file's content for download
    pub async fn download(&self, owner_id: Uuid, filename: &str) -> Result<DownloadedFile> {
        let record = self.find_by_filename(owner_id, filename).await?;
        let data = self.storage.download(&record.file_key).await?;

        Ok(DownloadedFile {
            filename: record.original_filename,
            content_type: record.content_type,
            data,
        })
    }

    /// Bundle several files into one ZIP archive.
    ///
    /// Unknown filenames fail the whole request; a partial archive would
    /// silently hide the miss.
    pub async fn download_batch(&self, owner_id: Uuid, filenames: &[String]) -> Result<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for filename in filenames {
            let file = self.download(owner_id, filename).await?;
            zip.start_file(file.filename.as_str(), options)
                .map_err(|e| AppError::Internal(format!("Failed to build archive: {}", e)))?;
            zip.write_all(&file.data)
                .map_err(|e| AppError::Internal(format!("Failed to build archive: {}", e)))?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| AppError::Internal(format!("Failed to build archive: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

/// Split a filename into stem and extension, keeping the dot with the
/// extension. A leading dot is part of the stem, not an extension.
fn split_filename(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => (&filename[..idx], &filename[idx..]),
        _ => (filename, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_filename() {
        assert_eq!(split_filename("photo.png"), ("photo", ".png"));
        assert_eq!(split_filename("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_filename("README"), ("README", ""));
        assert_eq!(split_filename(".env"), (".env", ""));
    }

    #[test]
    fn test_collision_rename_format() {
        let (stem, ext) = split_filename("photo.png");
        assert_eq!(format!("{}({}){}", stem, 1, ext), "photo(1).png");

        let (stem, ext) = split_filename("README");
        assert_eq!(format!("{}({}){}", stem, 2, ext), "README(2)");
    }
}
