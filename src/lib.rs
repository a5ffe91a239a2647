//! LMS Service Library
//!
//! Backend for a learning management system: user accounts, a course
//! catalog with media-bearing modules, enrollment and progress tracking,
//! and per-course feedback.
//!
//! # Features
//!
//! - **Accounts**: registration and login with bcrypt-hashed passwords and
//!   role-based access (admin, student)
//! - **JWT Auth**: day-long HS256 bearer tokens binding user id and role
//! - **Course Catalog**: admin-managed courses with ordered content modules
//!   and an object-storage side-channel for media uploads
//! - **Progress Tracking**: enrollment, idempotent module completion, and
//!   completion percentages
//! - **Feedback**: one rating per student per course with a cached average
//! - **PostgreSQL**: SQLx-backed persistence with embedded JSONB arrays and
//!   optimistic-concurrency version tokens
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lms_service::{
//!     api::{AppState, RouterBuilder},
//!     config::AppConfig,
//!     service::{
//!         CourseService, FeedbackService, HttpObjectStorage, JwtService, ProgressService,
//!         UploadService, UserService,
//!     },
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let pool = config.database.create_pool().await?;
//!
//!     let jwt_service = Arc::new(JwtService::new(config.jwt.secret.clone()));
//!     let uploads = UploadService::new(
//!         Arc::new(HttpObjectStorage::new(&config.storage)),
//!         &config.storage,
//!     );
//!
//!     let state = AppState {
//!         user_service: Arc::new(UserService::new(pool.clone(), jwt_service.clone())),
//!         course_service: Arc::new(CourseService::new(pool.clone(), uploads)),
//!         progress_service: Arc::new(ProgressService::new(pool.clone())),
//!         feedback_service: Arc::new(FeedbackService::new(pool)),
//!         jwt_service,
//!     };
//!
//!     let app = RouterBuilder::with_all_routes().build(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:4005").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod service;
pub mod utils;

#[cfg(test)]
pub mod testutil;

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
