//! Course Service Implementation
//!
//! Course catalog CRUD plus module management: bulk add, upload-driven add,
//! and single-module update with file replacement. Every read-modify-write
//! of the embedded module array is guarded by the course row's version
//! token; a lost race surfaces as a retryable conflict.

use futures::future::try_join_all;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::database::Pagination;
use crate::models::auth::CurrentUser;
use crate::models::course::{ContentType, Course, Module, ModuleSpec};
use crate::models::requests::{
    with_authors, CourseDetail, CourseSummary, EnrolledStudent, InstructorInfo,
    UpdateCourseDetailsRequest,
};
use crate::models::user::UserRole;
use crate::service::storage::{UploadService, UploadedFile};
use crate::utils::error::{AppError, AppResult};

const COURSE_COLUMNS: &str = "id, title, description, instructor_id, category, price, duration, \
     thumbnail_url, modules, students_enrolled, feedback, average_rating, version, \
     created_at, updated_at";

/// Everything a create-course request carries after multipart parsing
#[derive(Debug, Default)]
pub struct CreateCourseInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: Option<f64>,
    pub duration: Option<i32>,
    /// JSON-encoded array of module specs, parsed before use
    pub modules_json: Option<String>,
    pub thumbnail: Option<UploadedFile>,
    pub module_files: Vec<UploadedFile>,
}

/// Fields of a single-module update after multipart parsing
#[derive(Debug, Default)]
pub struct UpdateModuleInput {
    pub module_index: Option<i32>,
    pub title: Option<String>,
    pub file: Option<UploadedFile>,
}

/// Flat row for the catalog listing projection
#[derive(Debug, sqlx::FromRow)]
struct CourseSummaryRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    price: f64,
    duration: i32,
    thumbnail_url: String,
    average_rating: f64,
    instructor_id: Uuid,
    firstname: String,
    lastname: String,
}

impl From<CourseSummaryRow> for CourseSummary {
    fn from(row: CourseSummaryRow) -> Self {
        CourseSummary {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            price: row.price,
            duration: row.duration,
            thumbnail_url: row.thumbnail_url,
            average_rating: row.average_rating,
            instructor: InstructorInfo {
                id: row.instructor_id,
                firstname: row.firstname,
                lastname: row.lastname,
            },
        }
    }
}

/// Parse the client-supplied module spec array
///
/// Anything that is not valid JSON, or is valid JSON but not an array,
/// surfaces as a BadRequest.
pub fn parse_module_specs(raw: &str) -> AppResult<Vec<ModuleSpec>> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|_| {
        AppError::BadRequest("Invalid modules format. Expecting JSON array.".to_string())
    })?;
    if !value.is_array() {
        return Err(AppError::BadRequest("Modules must be an array".to_string()));
    }
    serde_json::from_value(value).map_err(|_| {
        AppError::BadRequest("Invalid modules format. Expecting JSON array.".to_string())
    })
}

/// Course catalog operations
#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
    uploads: UploadService,
}

impl CourseService {
    pub fn new(pool: PgPool, uploads: UploadService) -> Self {
        Self { pool, uploads }
    }

    async fn fetch_course(&self, id: Uuid) -> AppResult<Course> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {} FROM courses WHERE id = $1",
            COURSE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }

    /// Persist the full module array, guarded by the version token
    async fn store_modules(&self, course: &Course, modules: Vec<Module>) -> AppResult<Course> {
        sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET modules = $2, updated_at = NOW(), version = version + 1
             WHERE id = $1 AND version = $3
             RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(course.id)
        .bind(sqlx::types::Json(modules))
        .bind(course.version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Course was modified concurrently. Please retry.".to_string())
        })
    }

    /// Create a course with optional media uploads
    ///
    /// All uploads complete before the row is inserted: a failed upload
    /// fails the whole operation and nothing is persisted.
    pub async fn create(&self, actor: &CurrentUser, input: CreateCourseInput) -> AppResult<Course> {
        actor.authorize(&[UserRole::Admin], "Only admins can create courses")?;

        if input.title.trim().is_empty()
            || input.description.trim().is_empty()
            || input.category.trim().is_empty()
        {
            return Err(AppError::BadRequest(
                "Title, description and category are required".to_string(),
            ));
        }
        let price = input.price.unwrap_or(0.0);
        if price < 0.0 {
            return Err(AppError::BadRequest("Price cannot be negative".to_string()));
        }
        let duration = match input.duration {
            Some(d) if d >= 1 => d,
            _ => {
                return Err(AppError::BadRequest(
                    "Duration must be at least 1".to_string(),
                ))
            }
        };

        let specs = match input.modules_json.as_deref() {
            Some(raw) => parse_module_specs(raw)?,
            None => Vec::new(),
        };

        let Some(thumbnail) = input.thumbnail else {
            return Err(AppError::BadRequest("Thumbnail is required".to_string()));
        };
        let thumbnail_url = self
            .uploads
            .store(thumbnail.data, &thumbnail.filename, &thumbnail.content_type)
            .await?;

        // Per-module files are fanned out concurrently and joined before
        // anything touches the database. When files are present the uploaded
        // list fully replaces the parsed specs, pairing file i with spec i.
        let modules: Vec<Module> = if !input.module_files.is_empty() {
            let uploaded = try_join_all(input.module_files.iter().map(|file| {
                let uploads = self.uploads.clone();
                async move {
                    let url = uploads
                        .store(file.data.clone(), &file.filename, &file.content_type)
                        .await?;
                    Ok::<_, AppError>((url, ContentType::from_mime(&file.content_type)))
                }
            }))
            .await?;

            uploaded
                .into_iter()
                .enumerate()
                .map(|(i, (url, content_type))| {
                    let spec = specs.get(i).cloned().unwrap_or_default();
                    let mut module = spec.into_module(i);
                    module.content_type = content_type;
                    module.content_url = url;
                    module
                })
                .collect()
        } else {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, spec)| spec.into_module(i))
                .collect()
        };

        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses
                 (title, description, instructor_id, category, price, duration,
                  thumbnail_url, modules)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(actor.id)
        .bind(input.category.trim())
        .bind(price)
        .bind(duration)
        .bind(&thumbnail_url)
        .bind(sqlx::types::Json(modules))
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    /// Catalog listing: summary projection with instructor name
    pub async fn list(&self, pagination: Pagination) -> AppResult<Vec<CourseSummary>> {
        let rows = sqlx::query_as::<_, CourseSummaryRow>(
            r#"
            SELECT c.id, c.title, c.description, c.category, c.price, c.duration,
                   c.thumbnail_url, c.average_rating, c.instructor_id,
                   u.firstname, u.lastname
            FROM courses c
            JOIN users u ON u.id = c.instructor_id
            ORDER BY c.created_at
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CourseSummary::from).collect())
    }

    /// Courses the acting admin owns as instructor
    pub async fn list_mine(
        &self,
        actor: &CurrentUser,
        pagination: Pagination,
    ) -> AppResult<Vec<CourseSummary>> {
        actor.authorize(&[UserRole::Admin], "Only admins can access their courses")?;

        let rows = sqlx::query_as::<_, CourseSummaryRow>(
            r#"
            SELECT c.id, c.title, c.description, c.category, c.price, c.duration,
                   c.thumbnail_url, c.average_rating, c.instructor_id,
                   u.firstname, u.lastname
            FROM courses c
            JOIN users u ON u.id = c.instructor_id
            WHERE c.instructor_id = $1
            ORDER BY c.created_at
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(actor.id)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CourseSummary::from).collect())
    }

    /// Full projection: enrolled students and feedback with author names
    pub async fn get(&self, id: Uuid) -> AppResult<CourseDetail> {
        let course = self.fetch_course(id).await?;

        let instructor = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, firstname, lastname FROM users WHERE id = $1",
        )
        .bind(course.instructor_id)
        .fetch_one(&self.pool)
        .await?;

        let students = sqlx::query_as::<_, (Uuid, String, String, String)>(
            "SELECT id, email, firstname, lastname FROM users WHERE id = ANY($1) ORDER BY created_at",
        )
        .bind(&course.students_enrolled)
        .fetch_all(&self.pool)
        .await?;

        let author_ids: Vec<Uuid> = course.feedback.iter().map(|f| f.user).collect();
        let authors = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, firstname, lastname FROM users WHERE id = ANY($1)",
        )
        .bind(&author_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(CourseDetail {
            id: course.id,
            title: course.title,
            description: course.description,
            category: course.category,
            price: course.price,
            duration: course.duration,
            thumbnail_url: course.thumbnail_url,
            modules: course.modules.0.clone(),
            average_rating: course.average_rating,
            instructor: InstructorInfo {
                id: instructor.0,
                firstname: instructor.1,
                lastname: instructor.2,
            },
            students_enrolled: students
                .into_iter()
                .map(|(id, email, firstname, lastname)| EnrolledStudent {
                    id,
                    email,
                    firstname,
                    lastname,
                })
                .collect(),
            feedback: with_authors(&course.feedback, &authors),
            created_at: course.created_at,
            updated_at: course.updated_at,
        })
    }

    /// Update scalar fields only; modules and feedback stay untouched
    pub async fn update_details(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        request: UpdateCourseDetailsRequest,
    ) -> AppResult<Course> {
        actor.authorize(&[UserRole::Admin], "Only admins can update courses")?;

        request
            .validate()
            .map_err(|e| AppError::BadRequest(format!("Invalid course data: {}", e)))?;

        sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 category = COALESCE($4, category),
                 price = COALESCE($5, price),
                 duration = COALESCE($6, duration),
                 updated_at = NOW(),
                 version = version + 1
             WHERE id = $1
             RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.category)
        .bind(request.price)
        .bind(request.duration)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }

    /// Append new modules, pairing uploaded files positionally with specs
    ///
    /// Appends only; existing modules are never replaced or reordered. A
    /// file without a matching spec gets a default-titled module.
    pub async fn add_modules(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        modules_json: Option<String>,
        files: Vec<UploadedFile>,
    ) -> AppResult<Course> {
        actor.authorize(&[UserRole::Admin], "Only admins can update courses")?;

        let course = self.fetch_course(id).await?;
        let specs = parse_module_specs(modules_json.as_deref().unwrap_or("[]"))?;

        let existing_count = course.modules.len();
        let incoming = specs.len().max(files.len());
        let mut appended = Vec::with_capacity(incoming);

        for i in 0..incoming {
            let mut spec = specs.get(i).cloned().unwrap_or_default();
            if let Some(file) = files.get(i) {
                let url = self
                    .uploads
                    .store(file.data.clone(), &file.filename, &file.content_type)
                    .await?;
                spec.content_type = Some(ContentType::from_mime(&file.content_type));
                spec.content_url = Some(url);
            }
            appended.push(spec.into_module(existing_count + i));
        }

        let mut modules = course.modules.0.clone();
        modules.extend(appended);
        self.store_modules(&course, modules).await
    }

    /// Update one module in place: title and/or replacement file
    pub async fn update_module(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        input: UpdateModuleInput,
    ) -> AppResult<Course> {
        actor.authorize(&[UserRole::Admin], "Only admins can update courses")?;

        let course = self.fetch_course(id).await?;

        let index = match input.module_index {
            Some(i) if i >= 0 && (i as usize) < course.modules.len() => i as usize,
            _ => return Err(AppError::BadRequest("Invalid module index".to_string())),
        };

        let mut modules = course.modules.0.clone();

        if let Some(title) = input.title {
            if !title.trim().is_empty() {
                modules[index].title = title;
            }
        }

        if let Some(file) = input.file {
            let url = self
                .uploads
                .store(file.data, &file.filename, &file.content_type)
                .await?;
            modules[index].content_type = ContentType::from_mime(&file.content_type);
            modules[index].content_url = url;
        }

        self.store_modules(&course, modules).await
    }

    /// Delete a course and best-effort delete its uploaded module media
    ///
    /// Individual object deletions may fail without blocking the row delete.
    /// Enrollment records follow the course via the FK cascade.
    pub async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        actor.authorize(&[UserRole::Admin], "Only admins can delete courses")?;

        let course = self.fetch_course(id).await?;

        for module in course.modules.iter() {
            if !module.content_url.is_empty() {
                self.uploads.remove(&module.content_url).await;
            }
        }

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
