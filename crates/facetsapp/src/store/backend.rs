use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw key-value I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while ViewStore handles the "what" (view lists, current view, corruption).
pub trait StorageBackend {
    /// Read the payload stored under `key`.
    /// Returns Ok(None) if nothing has been stored yet.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the payload stored under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write(&self, key: &str, payload: &str) -> Result<()>;

    /// Where `key` lives. For FsBackend, this is the real path.
    /// For MemBackend, a virtual path.
    fn location(&self, key: &str) -> PathBuf;
}
