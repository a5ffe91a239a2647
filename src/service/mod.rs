//! Service Layer
//!
//! Business logic for accounts, courses, progress, feedback, tokens, and
//! object storage. Services take an explicit authenticated actor and are
//! testable without HTTP.

pub mod course;
pub mod feedback;
pub mod jwt;
pub mod progress;
pub mod storage;
pub mod user;

pub use course::CourseService;
pub use feedback::FeedbackService;
pub use jwt::JwtService;
pub use progress::ProgressService;
pub use storage::{HttpObjectStorage, ObjectStorage, UploadService};
pub use user::UserService;
