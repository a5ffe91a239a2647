//! Request and Response Models
//!
//! Data structures for API request and response payloads with validation.
//! Wire format is camelCase to match the frontend contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::course::{Course, FeedbackEntry};
use crate::models::progress::{CompletedModule, Progress};
use crate::models::user::{User, UserRole};
use crate::utils::validation::{email_validator, name_validator};

/// Request payload for registering a new account
///
/// Required fields default to empty strings on the wire so that presence is
/// checked by the service with a single combined message, then format rules
/// apply via `validate()`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "name_validator"))]
    pub firstname: String,

    #[serde(default)]
    #[validate(custom(function = "name_validator"))]
    pub lastname: String,

    #[serde(default)]
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Defaults to student when omitted
    pub role: Option<UserRole>,
}

/// Request payload for logging in
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Scalar course fields updatable without touching modules or feedback
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCourseDetailsRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 1, message = "Duration must be at least 1"))]
    pub duration: Option<i32>,
}

/// Request payload for marking a module complete
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteModuleRequest {
    pub module_index: Option<i32>,
}

/// Request payload for submitting course feedback
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// Response for registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: String,
    pub message: String,
    pub token: String,
}

/// Response for login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    pub token: String,
    pub user: User,
}

/// One row of the admin user listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Response for the admin user listing
#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub status: String,
    pub results: usize,
    pub data: Vec<UserSummary>,
}

/// Response for the role check endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRoleResponse {
    pub status: String,
    pub role: UserRole,
    pub redirect_to: String,
}

/// Instructor fields joined into course projections
#[derive(Debug, Clone, Serialize)]
pub struct InstructorInfo {
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
}

/// Catalog listing projection of a course
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub duration: i32,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub average_rating: f64,
    pub instructor: InstructorInfo,
}

/// Response for course listings
#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub status: String,
    pub results: usize,
    pub courses: Vec<CourseSummary>,
}

/// Enrolled-student fields resolved for the full course projection
#[derive(Debug, Serialize)]
pub struct EnrolledStudent {
    pub id: Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
}

/// Feedback entry with its author's name resolved
#[derive(Debug, Serialize)]
pub struct FeedbackWithAuthor {
    pub user: Option<InstructorInfo>,
    pub rating: i32,
    pub comment: String,
}

/// Full projection of a single course
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub duration: i32,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub modules: Vec<crate::models::course::Module>,
    pub average_rating: f64,
    pub instructor: InstructorInfo,
    pub students_enrolled: Vec<EnrolledStudent>,
    pub feedback: Vec<FeedbackWithAuthor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response wrapping a single full course projection
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    pub status: String,
    pub course: CourseDetail,
}

/// Response for course mutations that echo the updated row
#[derive(Debug, Serialize)]
pub struct CourseMutationResponse {
    pub status: String,
    pub message: String,
    pub course: Course,
}

/// Response for course deletion
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

/// Response for enrollment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub status: String,
    pub message: String,
    pub progress: Progress,
    /// Total enrolled students after this enrollment
    pub students_enrolled: usize,
}

/// Response for module completion
#[derive(Debug, Serialize)]
pub struct ProgressMutationResponse {
    pub status: String,
    pub message: String,
    pub progress: Progress,
}

/// Computed progress summary for one user in one course
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_modules: usize,
    pub completed_modules: usize,
    /// completed / total * 100, rounded to two decimals; 0 when the course
    /// has no modules
    pub completion_percentage: f64,
    pub completed_module_details: Vec<CompletedModule>,
}

/// Response wrapping a progress summary
#[derive(Debug, Serialize)]
pub struct ProgressSummaryResponse {
    pub status: String,
    pub progress: ProgressSummary,
}

/// Response for the feedback listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackListResponse {
    pub status: String,
    pub feedback: Vec<FeedbackWithAuthor>,
    pub average_rating: f64,
}

/// Feedback entries paired with resolved author info
pub fn with_authors(
    entries: &[FeedbackEntry],
    authors: &[(Uuid, String, String)],
) -> Vec<FeedbackWithAuthor> {
    entries
        .iter()
        .map(|entry| FeedbackWithAuthor {
            user: authors
                .iter()
                .find(|(id, _, _)| *id == entry.user)
                .map(|(id, firstname, lastname)| InstructorInfo {
                    id: *id,
                    firstname: firstname.clone(),
                    lastname: lastname.clone(),
                }),
            rating: entry.rating,
            comment: entry.comment.clone(),
        })
        .collect()
}

/// Response for health check
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}
