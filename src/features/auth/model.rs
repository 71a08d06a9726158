use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Per-request session context injected by the auth middleware.
/// Every owner-scoped query takes its owner id from `sub`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// User id (token subject)
    pub sub: Uuid,
    pub email: String,
    pub username: String,
}
