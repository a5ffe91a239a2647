//! Feedback Service Implementation
//!
//! One feedback entry per user per course, with the course's cached average
//! rating recomputed on every submission.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::auth::CurrentUser;
use crate::models::course::{round2, Course, FeedbackEntry};
use crate::models::requests::{with_authors, FeedbackWithAuthor, SubmitFeedbackRequest};
use crate::utils::error::{AppError, AppResult};

const COURSE_COLUMNS: &str = "id, title, description, instructor_id, category, price, duration, \
     thumbnail_url, modules, students_enrolled, feedback, average_rating, version, \
     created_at, updated_at";

/// Course feedback operations
#[derive(Clone)]
pub struct FeedbackService {
    pool: PgPool,
}

impl FeedbackService {
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

    async fn is_enrolled(&self, user_id: Uuid, course_id: Uuid) -> AppResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM progress WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Submit feedback and recompute the course's average rating
    pub async fn submit(
        &self,
        actor: &CurrentUser,
        course_id: Uuid,
        request: SubmitFeedbackRequest,
    ) -> AppResult<Course> {
        let (Some(rating), Some(comment)) = (request.rating, request.comment) else {
            return Err(AppError::BadRequest(
                "Rating and comment are required".to_string(),
            ));
        };
        if comment.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Rating and comment are required".to_string(),
            ));
        }
        if !(1..=5).contains(&rating) {
            return Err(AppError::BadRequest(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let course = self.fetch_course(course_id).await?;

        if !self.is_enrolled(actor.id, course_id).await? {
            return Err(AppError::Forbidden(
                "You must be enrolled in this course to leave feedback".to_string(),
            ));
        }

        if course.feedback.iter().any(|f| f.user == actor.id) {
            return Err(AppError::Conflict(
                "You have already submitted feedback for this course".to_string(),
            ));
        }

        let mut feedback = course.feedback.0.clone();
        feedback.push(FeedbackEntry {
            user: actor.id,
            rating,
            comment,
        });
        let average_rating = Course::mean_rating(&feedback);

        sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET feedback = $2, average_rating = $3, updated_at = NOW(), version = version + 1
             WHERE id = $1 AND version = $4
             RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(course.id)
        .bind(sqlx::types::Json(feedback))
        .bind(average_rating)
        .bind(course.version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Course was modified concurrently. Please retry.".to_string())
        })
    }

    /// All feedback for a course with author names resolved
    pub async fn list(&self, course_id: Uuid) -> AppResult<(Vec<FeedbackWithAuthor>, f64)> {
        let course = self.fetch_course(course_id).await?;

        let author_ids: Vec<Uuid> = course.feedback.iter().map(|f| f.user).collect();
        let authors = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, firstname, lastname FROM users WHERE id = ANY($1)",
        )
        .bind(&author_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok((
            with_authors(&course.feedback, &authors),
            round2(course.average_rating),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::progress::ProgressService;
    use crate::testutil::{seed_admin, seed_course, seed_student};

    fn request(rating: i32, comment: &str) -> SubmitFeedbackRequest {
        SubmitFeedbackRequest {
            rating: Some(rating),
            comment: Some(comment.to_string()),
        }
    }

    #[sqlx::test]
    async fn test_submit_requires_rating_and_comment(pool: PgPool) {
        let service = FeedbackService::new(pool.clone());
        let admin = seed_admin(&pool).await;
        let student = seed_student(&pool).await;
        let course_id = seed_course(&pool, &admin, 1).await;

        let missing_rating = SubmitFeedbackRequest {
            rating: None,
            comment: Some("great".to_string()),
        };
        let err = service
            .submit(&student, course_id, missing_rating)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let blank_comment = request(4, "   ");
        let err = service
            .submit(&student, course_id, blank_comment)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[sqlx::test]
    async fn test_submit_rejects_out_of_range_rating(pool: PgPool) {
        let service = FeedbackService::new(pool.clone());
        let admin = seed_admin(&pool).await;
        let student = seed_student(&pool).await;
        let course_id = seed_course(&pool, &admin, 1).await;

        for rating in [0, 6, -3] {
            let err = service
                .submit(&student, course_id, request(rating, "fine"))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[sqlx::test]
    async fn test_submit_requires_enrollment(pool: PgPool) {
        let service = FeedbackService::new(pool.clone());
        let admin = seed_admin(&pool).await;
        let student = seed_student(&pool).await;
        let course_id = seed_course(&pool, &admin, 1).await;

        let err = service
            .submit(&student, course_id, request(5, "never attended"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[sqlx::test]
    async fn test_average_recomputed_and_duplicates_rejected(pool: PgPool) {
        let feedback = FeedbackService::new(pool.clone());
        let progress = ProgressService::new(pool.clone());
        let admin = seed_admin(&pool).await;
        let alice = seed_student(&pool).await;
        let bob = seed_student(&pool).await;
        let course_id = seed_course(&pool, &admin, 2).await;

        progress.enroll(&alice, course_id).await.unwrap();
        progress.enroll(&bob, course_id).await.unwrap();

        let course = feedback
            .submit(&alice, course_id, request(4, "solid content"))
            .await
            .unwrap();
        assert_eq!(course.average_rating, 4.0);

        let course = feedback
            .submit(&bob, course_id, request(2, "too shallow"))
            .await
            .unwrap();
        assert_eq!(course.average_rating, 3.0);
        assert_eq!(course.feedback.len(), 2);

        let err = feedback
            .submit(&alice, course_id, request(5, "changed my mind"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[sqlx::test]
    async fn test_list_resolves_authors_and_rounds(pool: PgPool) {
        let feedback = FeedbackService::new(pool.clone());
        let progress = ProgressService::new(pool.clone());
        let admin = seed_admin(&pool).await;
        let course_id = seed_course(&pool, &admin, 1).await;

        for rating in [5, 4, 4] {
            let student = seed_student(&pool).await;
            progress.enroll(&student, course_id).await.unwrap();
            feedback
                .submit(&student, course_id, request(rating, "review"))
                .await
                .unwrap();
        }

        let (entries, average) = feedback.list(course_id).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.user.is_some()));
        assert_eq!(average, 4.33);
    }

    #[sqlx::test]
    async fn test_list_unknown_course_not_found(pool: PgPool) {
        let service = FeedbackService::new(pool);
        let err = service.list(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
