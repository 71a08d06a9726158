use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, MeResponseDto, RegisterRequestDto,
};
use crate::features::auth::models::User;
use crate::features::auth::token::JwtValidator;

/// Service for account registration and email/password login
pub struct AuthService {
    pool: PgPool,
    validator: Arc<JwtValidator>,
}

impl AuthService {
    pub fn new(pool: PgPool, validator: Arc<JwtValidator>) -> Self {
        Self { pool, validator }
    }

    /// Register a new account and issue an access token
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let email = dto.email.trim().to_lowercase();
        // Display name defaults to the local part of the email
        let username = dto
            .username
            .unwrap_or_else(|| email.split('@').next().unwrap_or("user").to_string());

        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = Self::hash_password(&dto.password)?;

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&email)
        .bind(&username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        info!("User registered: id={}, email={}", user.id, user.email);

        self.auth_response(user)
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let email = dto.email.trim().to_lowercase();

        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        let user = user
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !Self::verify_password(&dto.password, &user.password_hash) {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        self.auth_response(user)
    }

    /// Return profile info for the current session
    pub async fn get_me(&self, user_id: Uuid) -> Result<MeResponseDto> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let user = user.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(MeResponseDto {
            id: user.id,
            email: user.email,
            username: user.username,
        })
    }

    fn auth_response(&self, user: User) -> Result<AuthResponseDto> {
        let access_token = self
            .validator
            .issue_token(user.id, &user.email, &user.username)?;

        Ok(AuthResponseDto {
            user: AuthUserDto {
                id: user.id,
                email: user.email,
                username: user.username,
            },
            access_token,
            expires_in: self.validator.token_expiry_secs(),
        })
    }

    fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = AuthService::hash_password("correct horse battery").unwrap();

        assert!(AuthService::verify_password("correct horse battery", &hash));
        assert!(!AuthService::verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!AuthService::verify_password("anything", "not-a-phc-string"));
    }
}
