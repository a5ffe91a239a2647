//! Object Storage Service
//!
//! Streams uploaded file buffers to the object store and hands back public
//! URLs. The store itself sits behind the [`ObjectStorage`] trait so the
//! services stay testable without network access; the production
//! implementation speaks the bucket REST dialect over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::utils::error::{AppError, AppResult};

/// Fixed logical prefix all course media is stored under
const MEDIA_PREFIX: &str = "lms-courses";

/// Percent-encoding set matching JavaScript's `encodeURIComponent`
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// File buffer received from a multipart request, ready for upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Backend-agnostic object store operations
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write an object under the given key with the given content type
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> AppResult<()>;

    /// Delete the object under the given key
    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// HTTP client for a bucket REST endpoint
///
/// Uploads with `POST <base>/v0/b/<bucket>/o?uploadType=media&name=<key>` and
/// deletes with `DELETE <base>/v0/b/<bucket>/o/<encoded-key>`.
pub struct HttpObjectStorage {
    client: reqwest::Client,
    api_base: String,
    bucket: String,
}

impl HttpObjectStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> AppResult<()> {
        let url = format!(
            "{}/v0/b/{}/o?uploadType=media&name={}",
            self.api_base,
            self.bucket,
            encode_key(key)
        );

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Upload(format!(
                "storage returned {} for key {}",
                response.status(),
                key
            )));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let url = format!(
            "{}/v0/b/{}/o/{}",
            self.api_base,
            self.bucket,
            encode_key(key)
        );

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Upload(format!(
                "storage returned {} deleting key {}",
                response.status(),
                key
            )));
        }
        Ok(())
    }
}

fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ENCODE_SET).to_string()
}

/// Upload service: key generation, public URLs, and best-effort deletion
#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn ObjectStorage>,
    api_base: String,
    bucket: String,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>, config: &StorageConfig) -> Self {
        Self {
            storage,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
        }
    }

    /// Upload a file buffer and return its public URL
    ///
    /// The key is globally unique (random id + original name) under the
    /// fixed media prefix. On any storage failure the error propagates and
    /// the caller must not persist partial state.
    pub async fn store(
        &self,
        data: Vec<u8>,
        original_name: &str,
        content_type: &str,
    ) -> AppResult<String> {
        let key = format!("{}/{}-{}", MEDIA_PREFIX, Uuid::new_v4(), original_name);
        self.storage.put(&key, data, content_type).await?;
        Ok(self.public_url(&key))
    }

    /// Deterministic public URL for an object key
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/v0/b/{}/o/{}?alt=media",
            self.api_base,
            self.bucket,
            encode_key(key)
        )
    }

    /// Extract the object key back out of a public URL
    pub fn key_from_url(url: &str) -> Option<String> {
        let encoded = url.split("/o/").nth(1)?.split("?alt=media").next()?;
        percent_decode_str(encoded)
            .decode_utf8()
            .ok()
            .map(|s| s.into_owned())
    }

    /// Best-effort delete of the object behind a public URL
    ///
    /// Deletion failure must never block the operation that triggered it, so
    /// every failure path is logged and swallowed.
    pub async fn remove(&self, public_url: &str) {
        if public_url.is_empty() {
            return;
        }
        let Some(key) = Self::key_from_url(public_url) else {
            warn!("could not extract object key from URL: {}", public_url);
            return;
        };
        if let Err(e) = self.storage.delete(&key).await {
            warn!("failed to delete object {}: {}", key, e);
        }
    }
}
