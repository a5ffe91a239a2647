//! User Service Implementation
//!
//! Account registration, login, and the admin user listing. Password
//! hashing is an explicit step here, never a persistence-layer hook.

use std::sync::Arc;

use sqlx::PgPool;
use validator::Validate;

use crate::database::Pagination;
use crate::models::auth::CurrentUser;
use crate::models::requests::{LoginRequest, RegisterRequest, UserSummary};
use crate::models::user::{User, UserRole, UserWithPassword};
use crate::service::jwt::JwtService;
use crate::utils::error::{map_db_error, AppError, AppResult};
use crate::utils::security::{hash_password_with_cost, verify_password, DEFAULT_BCRYPT_COST};
use crate::utils::validation::normalize_email;

/// Core user service providing registration, login, and lookups
#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    jwt_service: Arc<JwtService>,
    /// bcrypt cost factor (lowered in tests, default elsewhere)
    bcrypt_cost: u32,
}

impl UserService {
    /// Creates a new UserService instance
    pub fn new(pool: PgPool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            pool,
            jwt_service,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Creates a UserService with a custom bcrypt cost
    pub fn with_bcrypt_cost(pool: PgPool, jwt_service: Arc<JwtService>, cost: u32) -> Self {
        Self {
            pool,
            jwt_service,
            bcrypt_cost: cost,
        }
    }

    /// Register a new account and return a signed token
    ///
    /// Fails BadRequest when any required field is missing, Conflict when the
    /// email is already registered. The role defaults to student.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<String> {
        if request.firstname.trim().is_empty()
            || request.lastname.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(AppError::BadRequest(
                "Enter all required details".to_string(),
            ));
        }

        request
            .validate()
            .map_err(|e| AppError::BadRequest(format!("Invalid user data: {}", e)))?;

        let email = normalize_email(&request.email);

        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password_with_cost(&request.password, self.bcrypt_cost)?;
        let role = request.role.unwrap_or(UserRole::Student);

        let user = sqlx::query_as::<_, UserWithPassword>(
            r#"
            INSERT INTO users (firstname, lastname, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, firstname, lastname, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(request.firstname.trim())
        .bind(request.lastname.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "users_email_key", "User already exists"))?;

        self.jwt_service.generate_token(user.id, user.role)
    }

    /// Authenticate an account and return a token plus the sanitized record
    pub async fn login(&self, request: LoginRequest) -> AppResult<(String, User)> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest("Enter your details".to_string()));
        }

        let email = normalize_email(&request.email);

        let user = sqlx::query_as::<_, UserWithPassword>(
            r#"
            SELECT id, firstname, lastname, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(user) = user else {
            return Err(AppError::Unauthenticated(
                "Invalid email or password".to_string(),
            ));
        };

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthenticated(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.jwt_service.generate_token(user.id, user.role)?;
        Ok((token, user.into()))
    }

    /// Look up a user by id
    pub async fn find_by_id(&self, id: uuid::Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, firstname, lastname, email, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Admin listing of all accounts
    pub async fn list_users(
        &self,
        actor: &CurrentUser,
        pagination: Pagination,
    ) -> AppResult<Vec<UserSummary>> {
        actor.authorize(
            &[UserRole::Admin],
            "Not authorized to access this resource",
        )?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, firstname, lastname, email, role, created_at, updated_at
            FROM users
            ORDER BY created_at
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users
            .into_iter()
            .map(|u| UserSummary {
                name: format!("{} {}", u.firstname, u.lastname),
                email: u.email,
                role: u.role,
                created_at: u.created_at,
            })
            .collect())
    }

    /// Role plus the dashboard route the frontend should redirect to
    pub async fn check_user_role(&self, actor: &CurrentUser) -> AppResult<(UserRole, String)> {
        // Re-read the row so a role change since token issue is reflected.
        let user = self.find_by_id(actor.id).await?;
        Ok((user.role, user.role.dashboard_route().to_string()))
    }

    /// Database connectivity probe for the health endpoint
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
