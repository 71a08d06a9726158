//! Enrichment module - client for the external Garden Model AI service

mod garden_client;

pub use garden_client::{ContentEnricher, EnrichmentResult, GardenModelClient};
