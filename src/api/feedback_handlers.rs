//! Feedback HTTP Handlers
//!
//! Feedback submission and per-course feedback listing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::api::handlers::{parse_id, AppState};
use crate::api::middleware::AuthUser;
use crate::models::requests::{
    CourseMutationResponse, FeedbackListResponse, SubmitFeedbackRequest,
};
use crate::utils::error::AppResult;

/// Submit feedback for a course the actor is enrolled in
pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(course_id): Path<String>,
    Json(request): Json<SubmitFeedbackRequest>,
) -> AppResult<(StatusCode, Json<CourseMutationResponse>)> {
    let course = state
        .feedback_service
        .submit(&actor, parse_id(&course_id)?, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseMutationResponse {
            status: "success".to_string(),
            message: "Feedback submitted successfully".to_string(),
            course,
        }),
    ))
}

/// List all feedback for a course
pub async fn list_feedback(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> AppResult<Json<FeedbackListResponse>> {
    let (feedback, average_rating) = state.feedback_service.list(parse_id(&course_id)?).await?;

    Ok(Json(FeedbackListResponse {
        status: "success".to_string(),
        feedback,
        average_rating,
    }))
}
