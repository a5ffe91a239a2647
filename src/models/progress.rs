//! Progress Model
//!
//! Per-user per-course enrollment and module-completion records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// One completed module, snapshotted at completion time
///
/// The title is captured when the module is completed and never re-derived,
/// so later title edits do not rewrite a student's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedModule {
    pub index: i32,
    pub title: String,
}

/// Progress row: which module positions a user has completed in a course
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub completed_modules: Json<Vec<CompletedModule>>,
    /// Optimistic-concurrency token; bumped on every write
    #[serde(skip_serializing)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Progress {
    /// Whether the given module index is already recorded complete
    pub fn has_completed(&self, index: i32) -> bool {
        self.completed_modules.iter().any(|m| m.index == index)
    }
}
