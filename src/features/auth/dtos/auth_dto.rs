use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::shared::validation::USERNAME_REGEX;

/// Request DTO for account registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Optional display name; defaults to the local part of the email
    #[validate(regex(path = *USERNAME_REGEX, message = "Invalid username"))]
    pub username: Option<String>,
}

/// Request DTO for email/password login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public user info returned with auth responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

/// Response DTO for successful register/login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub user: AuthUserDto,
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Response DTO for the current-session endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}
