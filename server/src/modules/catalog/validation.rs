//! Field-level validation support.
//!
//! Validation runs to completion before any write: every failing field is
//! collected into a [`FieldErrors`] map keyed by field name (nested fields
//! use dotted keys, e.g. `contributors.0.full_name`).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::modules::storage::UploadedFile;

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;
pub const MAX_PDF_BYTES: usize = 50 * 1024 * 1024;

/// Field name to message map. Only the first error per field is kept.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

/// Required string with a maximum length.
pub fn require(errors: &mut FieldErrors, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.add(field, format!("The {field} field is required"));
    } else if value.chars().count() > max_len {
        errors.add(
            field,
            format!("The {field} field must not be greater than {max_len} characters"),
        );
    }
}

/// Optional string with a maximum length.
pub fn optional_max(errors: &mut FieldErrors, field: &str, value: Option<&str>, max_len: usize) {
    if let Some(v) = value {
        if v.chars().count() > max_len {
            errors.add(
                field,
                format!("The {field} field must not be greater than {max_len} characters"),
            );
        }
    }
}

/// Uploaded image: any `image/*` content type, at most 2 MiB.
pub fn check_image(errors: &mut FieldErrors, field: &str, file: &UploadedFile) {
    if !file.is_image() {
        errors.add(field, format!("The {field} field must be an image"));
    } else if file.size() > MAX_IMAGE_BYTES {
        errors.add(field, format!("The {field} field must not be greater than 2048 kilobytes"));
    }
}

/// Uploaded PDF: `application/pdf`, at most 50 MiB.
pub fn check_pdf(errors: &mut FieldErrors, field: &str, file: &UploadedFile) {
    if !file.is_pdf() {
        errors.add(field, format!("The {field} field must be a PDF file"));
    } else if file.size() > MAX_PDF_BYTES {
        errors.add(field, format!("The {field} field must not be greater than 51200 kilobytes"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, len: usize) -> UploadedFile {
        UploadedFile {
            original_name: "file".to_string(),
            content_type: Some(content_type.to_string()),
            bytes: vec![0; len],
        }
    }

    #[test]
    fn test_require_empty_and_too_long() {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", "  ", 255);
        require(&mut errors, "isbn", &"9".repeat(21), 20);
        assert!(errors.get("title").is_some());
        assert!(errors.get("isbn").is_some());
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("name", "first");
        errors.add("name", "second");
        assert_eq!(errors.get("name"), Some("first"));
    }

    #[test]
    fn test_check_image_type_and_size() {
        let mut errors = FieldErrors::new();
        check_image(&mut errors, "cover_image", &upload("application/pdf", 10));
        assert!(errors.get("cover_image").is_some());

        let mut errors = FieldErrors::new();
        check_image(&mut errors, "cover_image", &upload("image/png", MAX_IMAGE_BYTES + 1));
        assert!(errors.get("cover_image").is_some());

        let mut errors = FieldErrors::new();
        check_image(&mut errors, "cover_image", &upload("image/png", 10));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_check_pdf() {
        let mut errors = FieldErrors::new();
        check_pdf(&mut errors, "pdf_file", &upload("image/png", 10));
        assert!(errors.get("pdf_file").is_some());

        let mut errors = FieldErrors::new();
        check_pdf(&mut errors, "pdf_file", &upload("application/pdf", 10));
        assert!(errors.is_empty());
    }
}
