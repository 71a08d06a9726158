//! Storage module for file management
//!
//! Provides MinIO/S3-compatible storage client for file uploads,
//! downloads, and deletion.

mod minio_client;

pub use minio_client::{ContentCategory, MinIOClient};
