// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Filesystem-backed persistence for vault records and content blobs.
//!
//! Metadata records are JSON files written atomically (temp file + rename),
//! so concurrent writers of the same record can never leave a torn or
//! duplicated row behind; the last rename wins. Content blobs are raw
//! files keyed by generated identifiers.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Record not found
    #[error("not found: {0}")]
    NotFound(String),
    /// Record already exists (create-new write lost the race)
    #[error("already exists: {0}")]
    AlreadyExists(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem storage for the vault.
#[derive(Debug, Clone)]
pub struct VaultStorage {
    paths: StoragePaths,
}

impl VaultStorage {
    /// Open the storage, creating the directory layout if needed.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn open(paths: StoragePaths) -> StorageResult<Self> {
        let dirs = [
            paths.users_dir(),
            paths.email_index_dir(),
            paths.documents_dir(),
            paths.shares_dir(),
            paths.blobs_dir(),
        ];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        Ok(Self { paths })
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Check that the storage root is writable.
    ///
    /// Performs a write-read-delete probe; used by the health endpoint.
    pub fn health_check(&self) -> StorageResult<()> {
        // Unique per call so concurrent probes cannot delete each other.
        let probe = self
            .paths
            .root()
            .join(format!(".health_check.{}", Uuid::new_v4()));
        let data = b"health_check";

        fs::write(&probe, data)?;
        let read = fs::read(&probe)?;
        fs::remove_file(&probe)?;

        if read != data {
            return Err(StorageError::Io(io::Error::other(
                "health check read back different data",
            )));
        }
        Ok(())
    }

    // ========== JSON Record Operations ==========

    /// Read a JSON record and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(path.display().to_string())
            } else {
                StorageError::Io(e)
            }
        })?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON record atomically (temp file + rename).
    ///
    /// Overwrites any existing record at the path in one step, which is
    /// what makes a keyed upsert a single conditional write.
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Unique per write, in the same directory so the rename stays on
        // one filesystem. A shared temp name would let concurrent writers
        // of the same record truncate each other mid-write.
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("record");
        let temp_path = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Write a JSON record only if nothing exists at the path.
    ///
    /// Fails with `AlreadyExists` when the path is taken; the filesystem's
    /// create-new semantics make this the loser-detection for concurrent
    /// writers (used by the email uniqueness index).
    pub fn write_json_new<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> StorageResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        Ok(())
    }

    /// Check if a record exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Delete a record.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let path = path.as_ref();
        fs::remove_file(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(path.display().to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }

    /// List the stems of all files in a directory with the given extension.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        Ok(ids)
    }

    /// List all subdirectories in a directory.
    pub fn list_dirs(&self, dir: impl AsRef<Path>) -> StorageResult<Vec<String>> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    // ========== Raw Blob Operations ==========

    /// Write raw bytes (document content).
    pub fn write_raw(&self, path: impl AsRef<Path>, data: &[u8]) -> StorageResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(())
    }

    /// Read raw bytes (document content).
    pub fn read_raw(&self, path: impl AsRef<Path>) -> StorageResult<Vec<u8>> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(path.display().to_string())
            } else {
                StorageError::Io(e)
            }
        })?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}
