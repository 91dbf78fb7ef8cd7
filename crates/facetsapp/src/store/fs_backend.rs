use super::backend::StorageBackend;
use crate::error::{FacetsError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores each key as `<root>/<key>.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(|c| c == '/' || c == '\\') || key.starts_with('.') {
            return Err(FacetsError::Store(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(FacetsError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(FacetsError::Io)?;
        Ok(Some(content))
    }

    fn write(&self, key: &str, payload: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.ensure_dir()?;

        let tmp_file = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_file, payload).map_err(FacetsError::Io)?;
        fs::rename(&tmp_file, &path).map_err(FacetsError::Io)?;

        Ok(())
    }

    fn location(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        assert_eq!(backend.read("views").unwrap(), None);
    }

    #[test]
    fn test_write_creates_root_and_file() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let backend = FsBackend::new(&root);

        backend.write("views", "[]").unwrap();

        assert!(root.join("views.json").exists());
        assert_eq!(backend.read("views").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_write_replaces_and_leaves_no_tmp() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path());

        backend.write("views", "[1]").unwrap();
        backend.write("views", "[2]").unwrap();

        assert_eq!(backend.read("views").unwrap().as_deref(), Some("[2]"));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let backend = FsBackend::new(dir.path());
        assert!(matches!(backend.read("../escape"), Err(FacetsError::Store(_))));
        assert!(matches!(backend.write("", "x"), Err(FacetsError::Store(_))));
    }

    #[test]
    fn test_location() {
        let backend = FsBackend::new("/tmp/facets");
        assert_eq!(backend.location("views"), PathBuf::from("/tmp/facets/views.json"));
    }
}
