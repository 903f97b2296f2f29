//! File-backed storage slot.
//!
//! The file holds a JSON object of string values keyed like browser local
//! storage, so one file can carry the cart next to anything else:
//!
//! ```json
//! { "cart": "[{\"id\":\"A\",\"quantity\":2,\"price\":\"10.00\",...}]" }
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use storecart_core::{KeyValueSlot, StorageError};

/// Default cart file, relative to the working directory.
pub const DEFAULT_CART_FILE: &str = ".storecart/storage.json";

/// Environment variable overriding the default cart file.
pub const CART_FILE_ENV: &str = "STORECART_CART_FILE";

/// Resolve the cart file: explicit flag, then environment, then default.
#[must_use]
pub fn resolve_cart_file(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| {
        std::env::var(CART_FILE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_CART_FILE))
}

/// One key of a JSON storage file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
    key: String,
}

impl FileSlot {
    /// Slot for `key` inside the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    /// Returns the storage file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(&self.key))
    }

    /// Replace this key's value, keeping the file's other keys.
    ///
    /// The file is rewritten through a temporary file in the same directory
    /// and renamed into place.
    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "Replacing unreadable storage file: {e}");
            BTreeMap::new()
        });
        entries.insert(self.key.clone(), value.to_owned());

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut file = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut file, &entries)?;
        file.write_all(b"\n")?;
        file.persist(&self.path)
            .map_err(|e| StorageError::Io(e.error))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storecart_core::CART_STORAGE_KEY;

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path().join("storage.json"), CART_STORAGE_KEY);
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn test_write_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/storage.json");
        let mut slot = FileSlot::new(&path, CART_STORAGE_KEY);

        slot.write("[]").unwrap();

        assert!(path.exists());
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_write_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let mut slot = FileSlot::new(&path, CART_STORAGE_KEY);
        slot.write("[]").unwrap();

        let theme = FileSlot::new(&path, "theme");
        assert_eq!(theme.read().unwrap().as_deref(), Some("dark"));
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_file_reads_as_error_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{oops").unwrap();

        let mut slot = FileSlot::new(&path, CART_STORAGE_KEY);
        assert!(matches!(slot.read(), Err(StorageError::Serialization(_))));

        slot.write("[]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_resolve_cart_file_prefers_flag() {
        let flag = PathBuf::from("/tmp/explicit.json");
        assert_eq!(resolve_cart_file(Some(flag.clone())), flag);
    }
}
