//! LMS Service Development Server
//!
//! Runs the full HTTP server with every route group enabled. Deployments
//! that need a narrower surface can assemble their own router with
//! `RouterBuilder` from the library crate.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use dotenv::dotenv;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use lms_service::{
    api::{AppState, RouterBuilder},
    config::AppConfig,
    service::{
        CourseService, FeedbackService, HttpObjectStorage, JwtService, ProgressService,
        UploadService, UserService,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    env_logger::init();

    log::info!("Starting LMS service v{}", lms_service::VERSION);

    let config = AppConfig::from_env()?;
    config.validate()?;

    let pool = config.database.create_pool().await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    let jwt_service = Arc::new(JwtService::with_expiration(
        config.jwt.secret.clone(),
        chrono::Duration::hours(config.jwt.expires_hours),
    ));
    let uploads = UploadService::new(
        Arc::new(HttpObjectStorage::new(&config.storage)),
        &config.storage,
    );

    let state = AppState {
        user_service: Arc::new(UserService::new(pool.clone(), jwt_service.clone())),
        course_service: Arc::new(CourseService::new(pool.clone(), uploads)),
        progress_service: Arc::new(ProgressService::new(pool.clone())),
        feedback_service: Arc::new(FeedbackService::new(pool)),
        jwt_service,
    };

    let cors = if config.server.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };

    let app = RouterBuilder::with_all_routes()
        .build(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Server running on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
