//! Course Model
//!
//! Course catalog rows and the module/feedback structures embedded in them.
//! Modules and feedback live inside the course row as JSONB arrays; module
//! order is positional and index-stable (no reorder or removal).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Kind of content a module delivers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Text,
    Image,
    Video,
    Audio,
    Pdf,
}

impl ContentType {
    /// Single classification used by every upload call site
    ///
    /// The media families map directly, `application/pdf` maps to `Pdf`, and
    /// anything unrecognized falls back to `Text`.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            ContentType::Image
        } else if mime.starts_with("video/") {
            ContentType::Video
        } else if mime.starts_with("audio/") {
            ContentType::Audio
        } else if mime == "application/pdf" {
            ContentType::Pdf
        } else {
            ContentType::Text
        }
    }
}

/// One content unit within a course, addressed by its position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub title: String,
    pub content_type: ContentType,
    /// Storage URL; empty only transiently while media is pending
    #[serde(default)]
    pub content_url: String,
}

/// Client-supplied module description, normalized before persistence
///
/// Every field is optional on the wire; [`ModuleSpec::into_module`]
/// guarantees the invariants (non-empty title, a content type, a content
/// URL) that every persisted module carries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
    pub title: Option<String>,
    pub content_type: Option<ContentType>,
    pub content_url: Option<String>,
}

impl ModuleSpec {
    /// Normalize into a persistable module, defaulting the title from the
    /// module's position
    pub fn into_module(self, index: usize) -> Module {
        let title = match self.title {
            Some(t) if !t.trim().is_empty() => t,
            _ => format!("Module {}", index + 1),
        };
        Module {
            title,
            content_type: self.content_type.unwrap_or_default(),
            content_url: self.content_url.unwrap_or_default(),
        }
    }
}

/// One feedback entry embedded in a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub user: Uuid,
    pub rating: i32,
    pub comment: String,
}

/// Course row including embedded modules and feedback
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "instructor")]
    pub instructor_id: Uuid,
    pub category: String,
    pub price: f64,
    pub duration: i32,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub modules: Json<Vec<Module>>,
    pub students_enrolled: Vec<Uuid>,
    pub feedback: Json<Vec<FeedbackEntry>>,
    /// Cached mean of feedback ratings; 0 when no feedback exists
    pub average_rating: f64,
    /// Optimistic-concurrency token; bumped on every write
    #[serde(skip_serializing)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Mean of the given ratings, 0.0 for an empty list
    pub fn mean_rating(feedback: &[FeedbackEntry]) -> f64 {
        if feedback.is_empty() {
            return 0.0;
        }
        let total: i32 = feedback.iter().map(|f| f.rating).sum();
        total as f64 / feedback.len() as f64
    }
}

/// Round to two decimal places for API-facing derived metrics
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_classification() {
        assert_eq!(ContentType::from_mime("image/png"), ContentType::Image);
        assert_eq!(ContentType::from_mime("image/jpeg"), ContentType::Image);
        assert_eq!(ContentType::from_mime("video/mp4"), ContentType::Video);
        assert_eq!(ContentType::from_mime("audio/mpeg"), ContentType::Audio);
        assert_eq!(ContentType::from_mime("application/pdf"), ContentType::Pdf);
        assert_eq!(ContentType::from_mime("text/plain"), ContentType::Text);
        assert_eq!(
            ContentType::from_mime("application/octet-stream"),
            ContentType::Text
        );
    }

    #[test]
    fn test_module_spec_normalization() {
        let spec = ModuleSpec {
            title: None,
            content_type: None,
            content_url: None,
        };
        let module = spec.into_module(2);
        assert_eq!(module.title, "Module 3");
        assert_eq!(module.content_type, ContentType::Text);
        assert_eq!(module.content_url, "");
    }

    #[test]
    fn test_module_spec_blank_title_defaults() {
        let spec = ModuleSpec {
            title: Some("   ".to_string()),
            content_type: Some(ContentType::Video),
            content_url: Some("https://cdn.example.com/intro.mp4".to_string()),
        };
        let module = spec.into_module(0);
        assert_eq!(module.title, "Module 1");
        assert_eq!(module.content_type, ContentType::Video);
    }

    #[test]
    fn test_module_wire_format_is_camel_case() {
        let module = Module {
            title: "Intro".to_string(),
            content_type: ContentType::Pdf,
            content_url: "https://example.com/intro.pdf".to_string(),
        };
        let json = serde_json::to_value(&module).unwrap();
        assert_eq!(json["contentType"], "pdf");
        assert_eq!(json["contentUrl"], "https://example.com/intro.pdf");
    }

    #[test]
    fn test_mean_rating() {
        let user = Uuid::new_v4();
        let feedback = vec![
            FeedbackEntry {
                user,
                rating: 4,
                comment: "good".to_string(),
            },
            FeedbackEntry {
                user: Uuid::new_v4(),
                rating: 2,
                comment: "meh".to_string(),
            },
        ];
        assert_eq!(Course::mean_rating(&feedback), 3.0);
        assert_eq!(Course::mean_rating(&[]), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(25.0), 25.0);
    }
}
