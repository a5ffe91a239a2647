//! JWT Authentication Service
//!
//! Token generation and validation. A single HS256 access token binds the
//! user id and role; the default lifetime is one day.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::models::auth::Claims;
use crate::models::user::UserRole;
use crate::utils::error::{AppError, AppResult};

/// JWT service for token management and validation
#[derive(Clone)]
pub struct JwtService {
    /// Signing secret
    secret: String,
    /// Token expiration duration (default: 1 day)
    expires_in: Duration,
}

impl JwtService {
    /// Create a new JWT service instance with the default 1-day expiry
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expires_in: Duration::days(1),
        }
    }

    /// Create a new JWT service with a custom token lifetime
    pub fn with_expiration(secret: String, expires_in: Duration) -> Self {
        Self { secret, expires_in }
    }

    /// Sign a token carrying the user's id and role
    pub fn generate_token(&self, user_id: Uuid, role: UserRole) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims::new(user_id, role, now + self.expires_in, now);

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.secret.as_ref());

        encode(&header, &claims, &encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Decode and validate a token, returning its claims
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let decoding_key = DecodingKey::from_secret(self.secret.as_ref());

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthenticated("Token expired. Please log in again.".to_string())
                }
                _ => AppError::Unauthenticated("Invalid token. Please log in again.".to_string()),
            })
    }

    /// Parse the subject claim back into a user id
    pub fn user_id_from_claims(claims: &Claims) -> AppResult<Uuid> {
        Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthenticated("Invalid token. Please log in again.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret_key_for_tokens".to_string())
    }

    #[test]
    fn test_token_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.generate_token(user_id, UserRole::Admin).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(JwtService::user_id_from_claims(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::with_expiration(
            "test_secret_key_for_tokens".to_string(),
            Duration::seconds(-120),
        );
        let token = service
            .generate_token(Uuid::new_v4(), UserRole::Student)
            .unwrap();

        let err = service.verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(msg) if msg.contains("expired")));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service()
            .generate_token(Uuid::new_v4(), UserRole::Student)
            .unwrap();

        let other = JwtService::new("a_completely_different_secret".to_string());
        let err = other.verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = service().verify_token("not.a.token").unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }
}
