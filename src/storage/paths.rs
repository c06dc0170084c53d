// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Path layout for the vault's on-disk storage.

use std::path::{Path, PathBuf};

/// Default root directory for vault data.
pub const DATA_ROOT: &str = "./data";

/// Path utilities for the vault storage layout.
///
/// ```text
/// {root}/
///   users/{user_id}.json
///   users/by_email/{email}          # uniqueness index -> user id
///   documents/{document_id}.json
///   shares/{document_id}/{recipient_id}.json
///   blobs/{storage_id}              # document content, opaque ids only
/// ```
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all vault data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user records.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user record.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    /// Directory for the email uniqueness index.
    pub fn email_index_dir(&self) -> PathBuf {
        self.users_dir().join("by_email")
    }

    /// Path to the index entry for an email address.
    ///
    /// The caller must pass a validated, lowercased address; validation
    /// guarantees it contains no path separators or control bytes.
    pub fn email_index(&self, email: &str) -> PathBuf {
        self.email_index_dir().join(email)
    }

    // ========== Document Paths ==========

    /// Directory containing all document metadata records.
    pub fn documents_dir(&self) -> PathBuf {
        self.root.join("documents")
    }

    /// Path to a specific document metadata record.
    pub fn document(&self, document_id: &str) -> PathBuf {
        self.documents_dir().join(format!("{document_id}.json"))
    }

    // ========== Share Paths ==========

    /// Directory containing all share grants.
    pub fn shares_dir(&self) -> PathBuf {
        self.root.join("shares")
    }

    /// Directory holding the grants for one document.
    pub fn document_shares_dir(&self, document_id: &str) -> PathBuf {
        self.shares_dir().join(document_id)
    }

    /// Path to the grant for a (document, recipient) pair.
    ///
    /// Keying the file by the pair makes a share upsert a single write:
    /// there can never be two rows for the same pair.
    pub fn share(&self, document_id: &str, recipient_id: &str) -> PathBuf {
        self.document_shares_dir(document_id)
            .join(format!("{recipient_id}.json"))
    }

    // ========== Blob Paths ==========

    /// Directory containing document content blobs.
    pub fn blobs_dir(&self) -> PathBuf {
        self.root.join("blobs")
    }

    /// Path to a content blob. `storage_id` is always a generated
    /// identifier, never caller-supplied input.
    pub fn blob(&self, storage_id: &str) -> PathBuf {
        self.blobs_dir().join(storage_id)
    }
}
