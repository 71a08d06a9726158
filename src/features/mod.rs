//! Features layer - each feature owns its routes, handlers, services,
//! DTOs, and models.

pub mod auth;
pub mod files;
pub mod search;
