//! HTTP Request Handlers
//!
//! Axum handlers for authentication, account listing, and the health check.
//! Course, progress, and feedback handlers live in their own modules.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::AuthUser;
use crate::database::Pagination;
use crate::models::requests::{
    CheckRoleResponse, HealthCheckResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, UsersListResponse,
};
use crate::service::{CourseService, FeedbackService, JwtService, ProgressService, UserService};
use crate::utils::error::{AppError, AppResult};
use crate::VERSION;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub course_service: Arc<CourseService>,
    pub progress_service: Arc<ProgressService>,
    pub feedback_service: Arc<FeedbackService>,
    pub jwt_service: Arc<JwtService>,
}

/// Optional pagination query parameters for listing endpoints
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page.unwrap_or(1), self.per_page.unwrap_or(50))
    }
}

/// Parse a path id, surfacing garbage as an operational 400
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid id: {}", raw)))
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let token = state.user_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "success".to_string(),
            message: "User registered successfully".to_string(),
            token,
        }),
    ))
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state.user_service.login(request).await?;

    Ok(Json(LoginResponse {
        status: "success".to_string(),
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

/// Admin listing of all accounts
pub async fn list_users(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<UsersListResponse>> {
    let users = state
        .user_service
        .list_users(&actor, page.pagination())
        .await?;

    Ok(Json(UsersListResponse {
        status: "success".to_string(),
        results: users.len(),
        data: users,
    }))
}

/// Role check used by the frontend to pick a dashboard
pub async fn check_user_role(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
) -> AppResult<Json<CheckRoleResponse>> {
    let (role, redirect_to) = state.user_service.check_user_role(&actor).await?;

    Ok(Json(CheckRoleResponse {
        status: "success".to_string(),
        role,
        redirect_to,
    }))
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<AppState>,
) -> AppResult<Json<HealthCheckResponse>> {
    state.user_service.health_check().await?;

    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    }))
}
