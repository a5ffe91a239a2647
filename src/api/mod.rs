//! HTTP API Layer
//!
//! Handlers, middleware, multipart extraction, and route definitions.

pub mod course_handlers;
pub mod extract;
pub mod feedback_handlers;
pub mod handlers;
pub mod middleware;
pub mod progress_handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::RouterBuilder;
