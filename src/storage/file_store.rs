// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON file storage with whole-file atomic writes.
//!
//! Files are rewritten by serializing to a sibling `.tmp` file and renaming
//! it over the target, so readers never observe a half-written document.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Storage not initialized
    #[error("Storage not initialized")]
    NotInitialized,
    /// Data read back does not match what was written
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// File-backed storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    paths: StoragePaths,
    initialized: bool,
}

impl FileStorage {
    /// Create a new FileStorage instance.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Create the data directory. Safe to call multiple times.
    pub fn initialize(&mut self) -> StorageResult<()> {
        fs::create_dir_all(self.paths.root())?;
        self.initialized = true;
        Ok(())
    }

    /// Write-read-delete probe of the data directory.
    pub fn health_check(&self) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let test_file = self.paths.root().join(".health_check");
        let test_data = b"health_check_data";

        fs::write(&test_file, test_data)?;
        let read_data = fs::read(&test_file)?;
        fs::remove_file(&test_file)?;

        if read_data != test_data {
            return Err(StorageError::IntegrityViolation(
                "Health check data mismatch".to_string(),
            ));
        }

        Ok(())
    }

    /// Read a JSON file and deserialize it.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<Option<T>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let file = match File::open(path.as_ref()) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let value = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(value))
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    fn test_storage() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut storage = FileStorage::new(StoragePaths::new(dir.path().join("data")));
        storage.initialize().expect("Failed to initialize test storage");
        (dir, storage)
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: String,
        value: i32,
    }

    #[test]
    fn initialize_creates_root() {
        let (_dir, storage) = test_storage();
        assert!(storage.paths().root().exists());
        assert!(storage.is_initialized());
    }

    #[test]
    fn write_and_read_json() {
        let (_dir, storage) = test_storage();
        let data = vec![TestData {
            id: "test-1".to_string(),
            value: 42,
        }];

        let path = storage.paths().registrations();
        storage.write_json(&path, &data).unwrap();

        let read: Option<Vec<TestData>> = storage.read_json(&path).unwrap();
        assert_eq!(read, Some(data));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn missing_file_reads_as_none() {
        let (_dir, storage) = test_storage();
        let read: Option<Vec<TestData>> = storage.read_json(storage.paths().registrations()).unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let (_dir, storage) = test_storage();
        let path = storage.paths().registrations();
        fs::write(&path, b"{ not json").unwrap();

        let result = storage.read_json::<Vec<TestData>>(&path);
        assert!(matches!(result, Err(StorageError::Json(_))));
    }

    #[test]
    fn health_check_works() {
        let (_dir, storage) = test_storage();
        storage.health_check().expect("Health check should pass");
    }

    #[test]
    fn uninitialized_storage_returns_error() {
        let storage = FileStorage::new(StoragePaths::new("/tmp/never-init"));

        let result = storage.read_json::<TestData>("/tmp/any.json");
        assert!(matches!(result, Err(StorageError::NotInitialized)));
        assert!(matches!(
            storage.health_check(),
            Err(StorageError::NotInitialized)
        ));
    }
}
