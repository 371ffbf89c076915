//! Flag store backed by a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use fab_core::{FlagStore, FlagWrite, MemoryFlags, StoreError, StoreResult};
use tracing::debug;

/// Flags loaded from a JSON object and written back on every change.
///
/// Without a path the store is purely in memory.
pub struct FlagFile {
    path: Option<PathBuf>,
    flags: MemoryFlags,
}

impl FlagFile {
    /// Open `path`, starting empty when it does not exist yet.
    pub fn open(path: Option<&Path>) -> Result<Self, String> {
        let flags = match path {
            Some(p) if p.exists() => {
                let raw = fs::read_to_string(p)
                    .map_err(|e| format!("cannot read {}: {e}", p.display()))?;
                serde_json::from_str(&raw)
                    .map_err(|e| format!("invalid flag file {}: {e}", p.display()))?
            }
            _ => MemoryFlags::new(),
        };
        if let Some(p) = path {
            debug!(path = %p.display(), flags = flags.len(), "flag file opened");
        }
        Ok(Self {
            path: path.map(Path::to_path_buf),
            flags,
        })
    }

    fn write_back(&self, key: &str) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write_error = |reason: String| StoreError::Write {
            key: key.to_string(),
            reason,
        };
        let json = serde_json::to_string_pretty(&self.flags).map_err(|e| write_error(e.to_string()))?;
        fs::write(path, json).map_err(|e| write_error(format!("{}: {e}", path.display())))
    }
}

impl FlagStore for FlagFile {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.flags.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.set_all(&[FlagWrite {
            key: key.to_string(),
            value: value.to_string(),
        }])
    }

    /// Apply every write in memory, then save the file once. A failed save
    /// restores the flags as they were.
    fn set_all(&mut self, writes: &[FlagWrite]) -> StoreResult<()> {
        let Some(first) = writes.first() else {
            return Ok(());
        };
        let before = self.flags.clone();
        for write in writes {
            self.flags.set(&write.key, &write.value)?;
        }
        if let Err(e) = self.write_back(&first.key) {
            self.flags = before;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(key: &str, value: &str) -> FlagWrite {
        FlagWrite {
            key: key.into(),
            value: value.into(),
        }
    }

    #[test]
    fn set_all_saves_once_and_reopens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flags.json");
        let mut flags = FlagFile::open(Some(&path)).unwrap();
        flags.set_all(&[write("a", "1"), write("b", "2")]).unwrap();

        let reopened = FlagFile::open(Some(&path)).unwrap();
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn failed_save_keeps_no_partial_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("flags.json");
        let mut flags = FlagFile::open(Some(&path)).unwrap();
        let err = flags.set_all(&[write("a", "1"), write("b", "2")]).unwrap_err();
        assert!(matches!(err, StoreError::Write { ref key, .. } if key == "a"));
        assert_eq!(flags.get("a").unwrap(), None);
        assert_eq!(flags.get("b").unwrap(), None);
    }
}
