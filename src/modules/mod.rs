//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services like storage and
//! AI enrichment.

pub mod enrichment;
pub mod storage;
