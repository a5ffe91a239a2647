//! Progress Service Implementation
//!
//! Enrollment and module-completion tracking. Completion is idempotent in
//! the sense that a second attempt on the same index is rejected, and module
//! titles are snapshotted at completion time, never re-derived later.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::auth::CurrentUser;
use crate::models::course::{round2, Course};
use crate::models::progress::{CompletedModule, Progress};
use crate::models::requests::ProgressSummary;
use crate::utils::error::{map_db_error, AppError, AppResult};

const PROGRESS_COLUMNS: &str =
    "id, user_id, course_id, completed_modules, version, created_at, updated_at";

const COURSE_COLUMNS: &str = "id, title, description, instructor_id, category, price, duration, \
     thumbnail_url, modules, students_enrolled, feedback, average_rating, version, \
     created_at, updated_at";

/// Enrollment and completion operations
#[derive(Clone)]
pub struct ProgressService {
    pool: PgPool,
}

impl ProgressService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
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

    async fn fetch_progress(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Option<Progress>> {
        Ok(sqlx::query_as::<_, Progress>(&format!(
            "SELECT {} FROM progress WHERE user_id = $1 AND course_id = $2",
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Enroll the actor in a course
    ///
    /// Creates an empty progress record and adds the actor to the course's
    /// enrolled set. Returns the progress plus the updated enrollment count.
    pub async fn enroll(
        &self,
        actor: &CurrentUser,
        course_id: Uuid,
    ) -> AppResult<(Progress, usize)> {
        let course = self.fetch_course(course_id).await?;

        if self.fetch_progress(actor.id, course_id).await?.is_some() {
            return Err(AppError::Conflict("User is already enrolled".to_string()));
        }

        let progress = sqlx::query_as::<_, Progress>(&format!(
            "INSERT INTO progress (user_id, course_id) VALUES ($1, $2) RETURNING {}",
            PROGRESS_COLUMNS
        ))
        .bind(actor.id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "progress_user_id_course_id_key", "User is already enrolled"))?;

        // Single-statement append: the membership guard makes the write
        // race-free without a version compare.
        let enrolled = sqlx::query_scalar::<_, Vec<Uuid>>(
            r#"
            UPDATE courses
            SET students_enrolled = array_append(students_enrolled, $2),
                updated_at = NOW(),
                version = version + 1
            WHERE id = $1 AND NOT (students_enrolled @> ARRAY[$2]::uuid[])
            RETURNING students_enrolled
            "#,
        )
        .bind(course_id)
        .bind(actor.id)
        .fetch_optional(&self.pool)
        .await?;

        let count = enrolled
            .map(|s| s.len())
            .unwrap_or(course.students_enrolled.len());

        Ok((progress, count))
    }

    /// Mark one module complete, snapshotting its title
    pub async fn complete_module(
        &self,
        actor: &CurrentUser,
        course_id: Uuid,
        module_index: Option<i32>,
    ) -> AppResult<Progress> {
        let Some(index) = module_index else {
            return Err(AppError::BadRequest("Module index is required".to_string()));
        };

        let course = self.fetch_course(course_id).await?;

        if index < 0 || (index as usize) >= course.modules.len() {
            return Err(AppError::BadRequest("Invalid module index".to_string()));
        }
        let title = course.modules[index as usize].title.clone();

        let progress = self
            .fetch_progress(actor.id, course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("User is not enrolled in this course".to_string())
            })?;

        if progress.has_completed(index) {
            return Err(AppError::Conflict(
                "Module is already marked as completed".to_string(),
            ));
        }

        let mut completed = progress.completed_modules.0.clone();
        completed.push(CompletedModule { index, title });

        sqlx::query_as::<_, Progress>(&format!(
            "UPDATE progress
             SET completed_modules = $2, updated_at = NOW(), version = version + 1
             WHERE id = $1 AND version = $3
             RETURNING {}",
            PROGRESS_COLUMNS
        ))
        .bind(progress.id)
        .bind(sqlx::types::Json(completed))
        .bind(progress.version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Progress was modified concurrently. Please retry.".to_string())
        })
    }

    /// Completion summary for the actor in one course
    pub async fn get_progress(
        &self,
        actor: &CurrentUser,
        course_id: Uuid,
    ) -> AppResult<ProgressSummary> {
        let course = self.fetch_course(course_id).await?;

        let progress = self
            .fetch_progress(actor.id, course_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("User is not enrolled in this course".to_string())
            })?;

        let total_modules = course.modules.len();
        let completed_count = progress.completed_modules.len();
        let completion_percentage = if total_modules > 0 {
            round2(completed_count as f64 / total_modules as f64 * 100.0)
        } else {
            0.0
        };

        Ok(ProgressSummary {
            total_modules,
            completed_modules: completed_count,
            completion_percentage,
            completed_module_details: progress.completed_modules.0.clone(),
        })
    }
}
