//! Course HTTP Handlers
//!
//! Catalog listing plus the admin-only multipart routes for course creation
//! and module management.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::api::extract::MultipartForm;
use crate::api::handlers::{parse_id, AppState, PageQuery};
use crate::api::middleware::AuthUser;
use crate::models::requests::{
    CourseDetailResponse, CourseListResponse, CourseMutationResponse, MessageResponse,
    UpdateCourseDetailsRequest,
};
use crate::service::course::{CreateCourseInput, UpdateModuleInput};
use crate::utils::error::{AppError, AppResult};

/// Public catalog listing
pub async fn list_courses(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<CourseListResponse>> {
    let courses = state.course_service.list(page.pagination()).await?;

    Ok(Json(CourseListResponse {
        status: "success".to_string(),
        results: courses.len(),
        courses,
    }))
}

/// Courses owned by the acting admin
pub async fn list_admin_courses(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<CourseListResponse>> {
    let courses = state
        .course_service
        .list_mine(&actor, page.pagination())
        .await?;

    Ok(Json(CourseListResponse {
        status: "success".to_string(),
        results: courses.len(),
        courses,
    }))
}

/// Full course projection
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CourseDetailResponse>> {
    let course = state.course_service.get(parse_id(&id)?).await?;

    Ok(Json(CourseDetailResponse {
        status: "success".to_string(),
        course,
    }))
}

/// Create a course from a multipart payload
///
/// Text fields: title, description, category, price, duration, modules
/// (JSON array). Files: `thumbnail` (single) and `modulefile` (repeated,
/// paired positionally with the module specs).
pub async fn create_course(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CourseMutationResponse>)> {
    let mut form = MultipartForm::collect(multipart).await?;

    let price = match form.take_text("price") {
        Some(raw) => Some(
            raw.parse::<f64>()
                .map_err(|_| AppError::BadRequest("Invalid price".to_string()))?,
        ),
        None => None,
    };
    let duration = match form.take_text("duration") {
        Some(raw) => Some(
            raw.parse::<i32>()
                .map_err(|_| AppError::BadRequest("Invalid duration".to_string()))?,
        ),
        None => None,
    };

    let input = CreateCourseInput {
        title: form.take_text("title").unwrap_or_default(),
        description: form.take_text("description").unwrap_or_default(),
        category: form.take_text("category").unwrap_or_default(),
        price,
        duration,
        modules_json: form.take_text("modules"),
        thumbnail: form.take_file("thumbnail"),
        module_files: form.take_files("modulefile"),
    };

    let course = state.course_service.create(&actor, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseMutationResponse {
            status: "success".to_string(),
            message: "Course created successfully".to_string(),
            course,
        }),
    ))
}

/// Update scalar course details
pub async fn update_course_details(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCourseDetailsRequest>,
) -> AppResult<Json<CourseMutationResponse>> {
    let course = state
        .course_service
        .update_details(&actor, parse_id(&id)?, request)
        .await?;

    Ok(Json(CourseMutationResponse {
        status: "success".to_string(),
        message: "Course details updated successfully".to_string(),
        course,
    }))
}

/// Append modules from a multipart payload (`modules` JSON + `file` uploads)
pub async fn add_modules(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<CourseMutationResponse>> {
    let mut form = MultipartForm::collect(multipart).await?;
    let modules_json = form.take_text("modules");
    let files = form.take_files("file");

    let course = state
        .course_service
        .add_modules(&actor, parse_id(&id)?, modules_json, files)
        .await?;

    Ok(Json(CourseMutationResponse {
        status: "success".to_string(),
        message: "New modules added successfully".to_string(),
        course,
    }))
}

/// Update one module in place (`moduleIndex`, optional `title` and `file`)
pub async fn update_module(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<CourseMutationResponse>> {
    let mut form = MultipartForm::collect(multipart).await?;

    // A missing or non-numeric index both fail the bounds check downstream.
    let module_index = form
        .take_text("moduleIndex")
        .and_then(|raw| raw.trim().parse::<i32>().ok());

    let input = UpdateModuleInput {
        module_index,
        title: form.take_text("title"),
        file: form.take_file("file"),
    };

    let course = state
        .course_service
        .update_module(&actor, parse_id(&id)?, input)
        .await?;

    Ok(Json(CourseMutationResponse {
        status: "success".to_string(),
        message: "Module updated successfully".to_string(),
        course,
    }))
}

/// Delete a course and its uploaded media
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(AuthUser(actor)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .course_service
        .delete(&actor, parse_id(&id)?)
        .await?;

    Ok(Json(MessageResponse {
        status: "success".to_string(),
        message: "Course and associated files deleted successfully".to_string(),
    }))
}
