//! Client for the external Garden Model enrichment service
//!
//! The service receives raw file bytes and returns extracted keywords,
//! a short summary, and the detected content type. It is invoked only
//! on the ingestion path, before a file record is persisted.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::core::config::EnrichmentConfig;
use crate::core::error::{AppError, Result};

/// Metadata produced by the enrichment service for one file
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentResult {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Content type as detected by the model; may differ from the client-supplied one
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Seam for the AI enrichment collaborator, kept as a trait so the
/// ingestion path can be tested without the external service.
#[async_trait]
pub trait ContentEnricher: Send + Sync {
    async fn enrich(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<EnrichmentResult>;
}

/// HTTP client for the Garden Model service
pub struct GardenModelClient {
    config: EnrichmentConfig,
    http_client: reqwest::Client,
}

impl GardenModelClient {
    pub fn new(config: EnrichmentConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl ContentEnricher for GardenModelClient {
    async fn enrich(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<EnrichmentResult> {
        let url = format!("{}/v1/enrich", self.config.base_url.trim_end_matches('/'));

        debug!("Requesting enrichment for '{}' ({})", filename, content_type);

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::BadRequest(format!("Invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Enrichment request failed: {}", e);
                AppError::ExternalServiceError(format!("Enrichment service unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Enrichment service error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Enrichment service returned HTTP {}",
                status
            )));
        }

        let result: EnrichmentResult = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse enrichment response: {}", e);
            AppError::ExternalServiceError(format!("Invalid enrichment response: {}", e))
        })?;

        debug!(
            "Enrichment for '{}' returned {} keywords",
            filename,
            result.keywords.len()
        );

        Ok(result)
    }
}
