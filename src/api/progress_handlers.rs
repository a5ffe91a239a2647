//! Progress HTTP Handlers
//!
//! Enrollment, module completion, and the per-course progress summary.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::api::handlers::{parse_id, AppState};
use crate::api::middleware::AuthUser;
use crate::models::requests::{
    CompleteModuleRequest, EnrollResponse, ProgressMutationResponse, ProgressSummaryResponse,
};
use crate::utils::error::AppResult;

/// Enroll the actor in a course
pub async fn enroll(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(course_id): Path<String>,
) -> AppResult<(StatusCode, Json<EnrollResponse>)> {
    let (progress, students_enrolled) = state
        .progress_service
        .enroll(&actor, parse_id(&course_id)?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollResponse {
            status: "success".to_string(),
            message: "Enrolled in course successfully".to_string(),
            progress,
            students_enrolled,
        }),
    ))
}

/// Mark a module as completed
pub async fn complete_module(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(course_id): Path<String>,
    Json(request): Json<CompleteModuleRequest>,
) -> AppResult<Json<ProgressMutationResponse>> {
    let progress = state
        .progress_service
        .complete_module(&actor, parse_id(&course_id)?, request.module_index)
        .await?;

    Ok(Json(ProgressMutationResponse {
        status: "success".to_string(),
        message: "Module marked as completed".to_string(),
        progress,
    }))
}

/// Completion summary for the actor in one course
pub async fn get_progress(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(course_id): Path<String>,
) -> AppResult<Json<ProgressSummaryResponse>> {
    let progress = state
        .progress_service
        .get_progress(&actor, parse_id(&course_id)?)
        .await?;

    Ok(Json(ProgressSummaryResponse {
        status: "success".to_string(),
        progress,
    }))
}
