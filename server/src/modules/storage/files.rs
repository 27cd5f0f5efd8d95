//! File storage rooted at a configured public directory.
//!
//! Stored files get a fresh UUID name (original extension preserved) and are
//! addressed by their path relative to the root, which is what the database
//! columns hold.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

/// A file received in a multipart request, held in memory until the service
/// layer decides to persist it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some("application/pdf")
    }
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Write a file under `dir` and return its storage-relative path.
    pub fn store(&self, dir: &str, file: &UploadedFile) -> io::Result<String> {
        let name = match extension(&file.original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let dir_path = self.root.join(dir);
        fs::create_dir_all(&dir_path)?;
        fs::write(dir_path.join(&name), &file.bytes)?;

        Ok(format!("{dir}/{name}"))
    }

    /// Delete a previously stored file. Missing files are not an error: the
    /// record may reference a path that was already cleaned up.
    pub fn delete(&self, relative: &str) -> io::Result<()> {
        let path = self.resolve(relative)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject traversal outside the storage root.
    fn resolve(&self, relative: &str) -> io::Result<PathBuf> {
        let rel = Path::new(relative);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage path: {relative}"),
            ));
        }
        Ok(self.root.join(rel))
    }
}

fn extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn upload(name: &str, content_type: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            content_type: Some(content_type.to_string()),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_store_keeps_extension_and_dir() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path()).unwrap();

        let path = storage
            .store("covers", &upload("portada.jpg", "image/jpeg", b"img"))
            .unwrap();

        assert!(path.starts_with("covers/"));
        assert!(path.ends_with(".jpg"));
        assert_eq!(fs::read(tmp.path().join(&path)).unwrap(), b"img");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path()).unwrap();

        let path = storage
            .store("books", &upload("x.pdf", "application/pdf", b"pdf"))
            .unwrap();

        storage.delete(&path).unwrap();
        // Second delete of the same path is a no-op
        storage.delete(&path).unwrap();
    }

    #[test]
    fn test_delete_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path()).unwrap();

        assert!(storage.delete("../outside.txt").is_err());
        assert!(storage.delete("/etc/passwd").is_err());
    }

    #[test]
    fn test_content_type_predicates() {
        let img = upload("a.png", "image/png", b"");
        let pdf = upload("a.pdf", "application/pdf", b"");
        assert!(img.is_image() && !img.is_pdf());
        assert!(pdf.is_pdf() && !pdf.is_image());
    }
}
