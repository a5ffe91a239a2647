//! User Model
//!
//! Core user data structures and role definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to every account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Student,
}

impl UserRole {
    /// Dashboard route the frontend redirects this role to
    pub fn dashboard_route(&self) -> &'static str {
        match self {
            UserRole::Admin => "/admin-dashboard",
            UserRole::Student => "/dashboard",
        }
    }
}

/// User representation for external API responses
///
/// This struct represents an account without sensitive information like the
/// password hash. All datetime fields use UTC.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    pub firstname: String,

    pub lastname: String,

    /// Email address (unique, normalized)
    pub email: String,

    pub role: UserRole,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Internal user representation including password hash
///
/// Used for database operations that need the hash. Never exposed in API
/// responses.
#[derive(Debug, sqlx::FromRow)]
pub struct UserWithPassword {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserWithPassword> for User {
    /// Strips the password hash so it cannot leak into API responses
    fn from(user: UserWithPassword) -> Self {
        User {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_with_password_conversion() {
        let now = Utc::now();
        let user_with_password = UserWithPassword {
            id: Uuid::new_v4(),
            firstname: "Test".to_string(),
            lastname: "Student".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            role: UserRole::Student,
            created_at: now,
            updated_at: now,
        };

        let user: User = user_with_password.into();

        assert_eq!(user.firstname, "Test");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.role, UserRole::Student);
    }

    #[test]
    fn test_user_serializes_camel_case_without_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            firstname: "A".to_string(),
            lastname: "B".to_string(),
            email: "a@b.com".to_string(),
            role: UserRole::Admin,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_dashboard_routes() {
        assert_eq!(UserRole::Admin.dashboard_route(), "/admin-dashboard");
        assert_eq!(UserRole::Student.dashboard_route(), "/dashboard");
    }
}
