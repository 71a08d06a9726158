use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    username: String,
    iat: i64,
    exp: i64,
}

/// Issues and validates HS256 access tokens
pub struct JwtValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_secs: i64,
    leeway: u64,
}

impl JwtValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_expiry_secs: config.token_expiry.as_secs() as i64,
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    /// Create a signed access token for the given user
    pub fn issue_token(&self, user_id: Uuid, email: &str, username: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            iat: now,
            exp: now + self.token_expiry_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and extract the session context
    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?;

        let sub = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Auth("Invalid token subject".to_string()))?;

        Ok(AuthenticatedUser {
            sub,
            email: data.claims.email,
            username: data.claims.username,
        })
    }

    /// Access token lifetime in seconds, reported to clients on login
    pub fn token_expiry_secs(&self) -> i64 {
        self.token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_validator() -> JwtValidator {
        JwtValidator::new(&AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            token_expiry: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let validator = test_validator();
        let user_id = Uuid::new_v4();

        let token = validator
            .issue_token(user_id, "alice@example.com", "alice")
            .unwrap();
        let user = validator.validate_token(&token).unwrap();

        assert_eq!(user.sub, user_id);
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let validator = test_validator();
        assert!(validator.validate_token("not-a-token").is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let validator = test_validator();
        let other = JwtValidator::new(&AuthConfig {
            jwt_secret: "another-secret-another-secret-xx".to_string(),
            token_expiry: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(60),
        });

        let token = other.issue_token(Uuid::new_v4(), "a@b.c", "a").unwrap();
        assert!(validator.validate_token(&token).is_err());
    }
}
