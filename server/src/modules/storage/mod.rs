//! Local-disk storage for uploaded files.

mod files;

pub use files::{FileStorage, UploadedFile};

/// Subdirectory for book cover images.
pub const COVERS_DIR: &str = "covers";
/// Subdirectory for book PDFs.
pub const BOOKS_DIR: &str = "books";
/// Subdirectory for category images.
pub const CATEGORIES_DIR: &str = "categories";
