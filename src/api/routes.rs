//! API Route Definitions
//!
//! All HTTP routes built through a builder so deployments can enable only
//! the route groups they need. Protected routes share the bearer-token
//! middleware; everything else is public.

use axum::{
    extract::Request,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use super::course_handlers::*;
use super::feedback_handlers::*;
use super::handlers::*;
use super::middleware::auth_middleware;
use super::progress_handlers::*;
use crate::utils::error::AppError;

/// Builder for creating API routes with configurable route groups
#[derive(Default)]
pub struct RouterBuilder {
    /// Whether to enable the health check endpoint (GET /health)
    health_check: bool,
    /// Whether to enable auth routes (/api/auth/...)
    auth_routes: bool,
    /// Whether to enable course routes (/api/courses/...)
    course_routes: bool,
    /// Whether to enable progress routes (/api/progress/...)
    progress_routes: bool,
    /// Whether to enable feedback routes (/api/feedback/...)
    feedback_routes: bool,
}

impl RouterBuilder {
    /// Creates a new router builder with all routes disabled by default
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router builder with every route group enabled
    pub fn with_all_routes() -> Self {
        Self {
            health_check: true,
            auth_routes: true,
            course_routes: true,
            progress_routes: true,
            feedback_routes: true,
        }
    }

    /// Creates a router builder exposing only the public catalog
    ///
    /// Health check plus unauthenticated course browsing. Useful for a
    /// read-only mirror that must not accept writes.
    pub fn with_catalog_routes() -> Self {
        Self {
            health_check: true,
            auth_routes: false,
            course_routes: true,
            progress_routes: false,
            feedback_routes: false,
        }
    }

    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    pub fn auth_routes(mut self, enabled: bool) -> Self {
        self.auth_routes = enabled;
        self
    }

    pub fn course_routes(mut self, enabled: bool) -> Self {
        self.course_routes = enabled;
        self
    }

    pub fn progress_routes(mut self, enabled: bool) -> Self {
        self.progress_routes = enabled;
        self
    }

    pub fn feedback_routes(mut self, enabled: bool) -> Self {
        self.feedback_routes = enabled;
        self
    }

    /// Builds the Axum router with the configured route groups
    ///
    /// Protected routes are gated by the auth middleware; unmatched paths
    /// fall through to a structured 404.
    pub fn build(self, state: AppState) -> Router {
        let mut public = Router::new();
        let mut protected = Router::new();

        if self.health_check {
            public = public.route("/health", get(health_check));
        }

        if self.auth_routes {
            public = public
                .route("/api/auth/register", post(register))
                .route("/api/auth/login", post(login));
            protected = protected
                .route("/api/auth/users", get(list_users))
                .route("/api/auth/check-user-role", get(check_user_role));
        }

        if self.course_routes {
            public = public
                .route("/api/courses", get(list_courses))
                .route("/api/courses/{id}", get(get_course));
            protected = protected
                .route("/api/courses", post(create_course))
                .route("/api/courses/admin", get(list_admin_courses))
                .route(
                    "/api/courses/{id}",
                    put(update_course_details).delete(delete_course),
                )
                .route("/api/courses/{id}/modules", put(add_modules))
                .route("/api/courses/{id}/module", put(update_module));
        }

        if self.progress_routes {
            protected = protected
                .route("/api/progress/enroll/{courseId}", post(enroll))
                .route("/api/progress/complete/{courseId}", put(complete_module))
                .route("/api/progress/{courseId}", get(get_progress));
        }

        if self.feedback_routes {
            protected = protected
                .route("/api/feedback/{courseId}", post(submit_feedback).get(list_feedback));
        }

        let has_protected_routes = self.auth_routes
            || self.course_routes
            || self.progress_routes
            || self.feedback_routes;
        if has_protected_routes {
            protected = protected.route_layer(from_fn_with_state(state.clone(), auth_middleware));
        }

        Router::new()
            .merge(public)
            .merge(protected)
            .fallback(not_found)
            .with_state(state)
    }
}

/// Structured 404 for unmatched routes
async fn not_found(request: Request) -> AppError {
    AppError::NotFound(format!("Can't find {} on this server", request.uri().path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RouterBuilder::new() starts with every group disabled
    #[test]
    fn test_router_builder_new() {
        let builder = RouterBuilder::new();

        assert!(!builder.health_check);
        assert!(!builder.auth_routes);
        assert!(!builder.course_routes);
        assert!(!builder.progress_routes);
        assert!(!builder.feedback_routes);
    }

    #[test]
    fn test_router_builder_with_all_routes() {
        let builder = RouterBuilder::with_all_routes();

        assert!(builder.health_check);
        assert!(builder.auth_routes);
        assert!(builder.course_routes);
        assert!(builder.progress_routes);
        assert!(builder.feedback_routes);
    }

    #[test]
    fn test_router_builder_with_catalog_routes() {
        let builder = RouterBuilder::with_catalog_routes();

        assert!(builder.health_check);
        assert!(builder.course_routes);
        assert!(!builder.auth_routes);
        assert!(!builder.progress_routes);
        assert!(!builder.feedback_routes);
    }

    #[test]
    fn test_router_builder_individual_methods() {
        let builder = RouterBuilder::new()
            .health_check(true)
            .auth_routes(true)
            .course_routes(false)
            .progress_routes(true)
            .feedback_routes(false);

        assert!(builder.health_check);
        assert!(builder.auth_routes);
        assert!(!builder.course_routes);
        assert!(builder.progress_routes);
        assert!(!builder.feedback_routes);
    }
}
