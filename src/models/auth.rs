//! Authentication Models
//!
//! JWT claims and the authenticated-actor context passed into services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{User, UserRole};
use crate::utils::error::{AppError, AppResult};

/// JWT claims binding a user id and role to a signed token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: String,

    /// Role at signing time
    pub role: UserRole,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for a user with the given expiry
    pub fn new(
        user_id: Uuid,
        role: UserRole,
        expires_at: DateTime<Utc>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            role,
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        }
    }
}

/// Authenticated actor resolved from a verified bearer token
///
/// Services receive this explicit context instead of any framework request
/// object, which keeps every operation testable without HTTP.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Fail with Forbidden unless the actor's role is in the allowed set
    pub fn authorize(&self, allowed: &[UserRole], message: &str) -> AppResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(message.to_string()))
        }
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            role: user.role,
        }
    }
}
