//! A TOML document updated in place by several app instances.

use confsched_core::{Result, ScheduleError};
use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Reads go straight to the file. Updates hold an exclusive lock on a
/// sibling `.lock` file and replace the document through a renamed temp
/// file, so readers never see a half-written document.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _document: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _document: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file is missing or blank.
    pub fn load(&self) -> Result<Option<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(toml::from_str(&content)?))
    }

    /// Applies `apply` to the stored document (or `initial` when there is
    /// none) and writes the result back. Returns what was written.
    pub fn update<F>(&self, initial: T, apply: F) -> Result<T>
    where
        F: FnOnce(&mut T),
    {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| ScheduleError::io(format!("{} has no parent", self.path.display())))?;
        fs::create_dir_all(parent)?;

        let lock_path = self.path.with_extension("lock");
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        lock.lock_exclusive()
            .map_err(|e| ScheduleError::io(format!("Failed to lock {}: {}", lock_path.display(), e)))?;

        let outcome = self.load().and_then(|stored| {
            let mut document = stored.unwrap_or(initial);
            apply(&mut document);
            self.replace(parent, &document)?;
            Ok(document)
        });

        // Unlocks on close.
        drop(lock);
        let _ = fs::remove_file(&lock_path);
        outcome
    }

    fn replace(&self, parent: &Path, document: &T) -> Result<()> {
        let name = self
            .path
            .file_name()
            .ok_or_else(|| ScheduleError::io(format!("{} has no file name", self.path.display())))?;
        let staging = parent.join(format!(".{}.tmp", name.to_string_lossy()));

        let mut file = File::create(&staging)?;
        file.write_all(toml::to_string_pretty(document)?.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Flags {
        seen: bool,
        count: u32,
    }

    #[test]
    fn test_load_missing_and_empty_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flags.toml");
        let file = AtomicTomlFile::<Flags>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_update_starts_from_default_and_accumulates() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Flags>::new(temp_dir.path().join("nested/flags.toml"));

        let first = file.update(Flags::default(), |f| f.count += 2).unwrap();
        assert_eq!(first.count, 2);
        let second = file.update(Flags::default(), |f| f.seen = true).unwrap();
        assert_eq!(second, Flags { seen: true, count: 2 });
        assert_eq!(file.load().unwrap(), Some(second));

        assert!(!temp_dir.path().join("nested/.flags.toml.tmp").exists());
        assert!(!temp_dir.path().join("nested/flags.lock").exists());
    }

    #[test]
    fn test_failed_update_leaves_document_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("flags.toml");
        fs::write(&path, "seen = [").unwrap();
        let file = AtomicTomlFile::<Flags>::new(path.clone());

        let err = file.update(Flags::default(), |f| f.seen = true).unwrap_err();
        assert!(err.is_serialization());
        assert_eq!(fs::read_to_string(&path).unwrap(), "seen = [");
        assert!(!temp_dir.path().join("flags.lock").exists());
    }
}
