//! Multipart Extraction
//!
//! Collects a multipart request body into text fields and file buffers so
//! handlers can hand plain data to the services.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::service::storage::UploadedFile;
use crate::utils::error::{AppError, AppResult};

/// Parsed multipart body: text fields plus files keyed by field name
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadedFile)>,
}

impl MultipartForm {
    /// Drain the whole multipart stream into memory
    ///
    /// Files are buffered the way the original upload pipeline expects; the
    /// router's body limit bounds the total size.
    pub async fn collect(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(filename) = field.file_name().map(str::to_string) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
                    .to_vec();
                form.files.push((
                    name,
                    UploadedFile {
                        filename,
                        content_type,
                        data,
                    },
                ));
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Remove and return a text field
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Remove and return the first file under the given field name
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let position = self.files.iter().position(|(n, _)| n == name)?;
        Some(self.files.remove(position).1)
    }

    /// Remove and return every file under the given field name, in order
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let mut taken = Vec::new();
        let mut remaining = Vec::new();
        for (n, file) in self.files.drain(..) {
            if n == name {
                taken.push(file);
            } else {
                remaining.push((n, file));
            }
        }
        self.files = remaining;
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(files: Vec<(&str, &str)>, fields: Vec<(&str, &str)>) -> MultipartForm {
        MultipartForm {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: files
                .into_iter()
                .map(|(field, filename)| {
                    (
                        field.to_string(),
                        UploadedFile {
                            filename: filename.to_string(),
                            content_type: "application/octet-stream".to_string(),
                            data: vec![],
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_take_text() {
        let mut form = form_with(vec![], vec![("title", "Rust")]);
        assert_eq!(form.take_text("title").as_deref(), Some("Rust"));
        assert_eq!(form.take_text("title"), None);
    }

    #[test]
    fn test_take_files_preserves_order_and_other_fields() {
        let mut form = form_with(
            vec![("file", "a.mp4"), ("thumbnail", "t.png"), ("file", "b.pdf")],
            vec![],
        );

        let files = form.take_files("file");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename, "a.mp4");
        assert_eq!(files[1].filename, "b.pdf");

        // The thumbnail is still there for its own take.
        assert!(form.take_file("thumbnail").is_some());
    }
}
