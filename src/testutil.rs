//! Test Support
//!
//! In-memory object storage doubles and database seeding helpers shared by
//! the service test suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::models::auth::CurrentUser;
use crate::models::user::{User, UserRole};
use crate::service::storage::{ObjectStorage, UploadService, UploadedFile};
use crate::utils::error::{AppError, AppResult};

/// Object store double backed by a HashMap
pub struct InMemoryObjectStorage {
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> AppResult<()> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (content_type.to_string(), data));
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        match self.objects.lock().unwrap().remove(key) {
            Some(_) => Ok(()),
            None => Err(AppError::Upload(format!("no such object: {}", key))),
        }
    }
}

/// Object store double whose writes always fail
pub struct FailingObjectStorage;

#[async_trait]
impl ObjectStorage for FailingObjectStorage {
    async fn put(&self, _key: &str, _data: Vec<u8>, _content_type: &str) -> AppResult<()> {
        Err(AppError::Upload("simulated storage outage".to_string()))
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(AppError::Upload("simulated storage outage".to_string()))
    }
}

/// Storage config pointing at a fake bucket
pub fn test_storage_config() -> StorageConfig {
    StorageConfig {
        api_base: "https://firebasestorage.googleapis.com".to_string(),
        bucket: "lms-media-test".to_string(),
    }
}

/// Upload service wired to the given storage double
pub fn test_upload_service(storage: Arc<dyn ObjectStorage>) -> UploadService {
    UploadService::new(storage, &test_storage_config())
}

/// Uploaded file fixture
pub fn file(name: &str, content_type: &str) -> UploadedFile {
    UploadedFile {
        filename: name.to_string(),
        content_type: content_type.to_string(),
        data: b"test file contents".to_vec(),
    }
}

/// Insert a user row directly and return the authenticated-actor view
pub async fn seed_user(pool: &PgPool, role: UserRole) -> CurrentUser {
    let email = format!("user-{}@example.com", Uuid::new_v4());
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (firstname, lastname, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, firstname, lastname, email, role, created_at, updated_at
        "#,
    )
    .bind("Test")
    .bind("User")
    .bind(&email)
    .bind("$2b$04$testhashtesthashtesthash")
    .bind(role)
    .fetch_one(pool)
    .await
    .expect("failed to seed user");

    user.into()
}

pub async fn seed_admin(pool: &PgPool) -> CurrentUser {
    seed_user(pool, UserRole::Admin).await
}

/// Insert a course row with the given number of text modules
pub async fn seed_course(pool: &PgPool, instructor: &CurrentUser, module_count: usize) -> Uuid {
    let modules: Vec<crate::models::course::Module> = (0..module_count)
        .map(|i| crate::models::course::Module {
            title: format!("Module {}", i + 1),
            content_type: crate::models::course::ContentType::Text,
            content_url: String::new(),
        })
        .collect();

    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO courses (title, description, instructor_id, category, duration,
                             thumbnail_url, modules)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind("Seeded Course")
    .bind("A course inserted directly for tests")
    .bind(instructor.id)
    .bind("Testing")
    .bind(10)
    .bind("https://example.com/thumb.png")
    .bind(sqlx::types::Json(modules))
    .fetch_one(pool)
    .await
    .expect("failed to seed course")
}

pub async fn seed_student(pool: &PgPool) -> CurrentUser {
    seed_user(pool, UserRole::Student).await
}
