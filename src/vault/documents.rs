// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Document metadata and content: upload, listing, rename, soft delete.
//!
//! Content lives in the blob store under a freshly generated storage id;
//! caller-supplied names never reach a filesystem path. The metadata
//! record is authoritative: a document whose `deleted_at` is set is gone
//! even if its blob lingers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{VaultError, VaultResult};
use super::sharing::{AccessLevel, SharePermission, SharingEngine};
use super::users::UserRegistry;
use super::validate;
use crate::storage::{StorageError, VaultStorage};

/// Encryption label recorded on every document. Content encryption
/// itself is out of scope; the field documents the intended algorithm.
const ENCRYPTION_ALGO: &str = "AES-256-GCM";

/// Default page size when the requested one is out of range.
const DEFAULT_PER_PAGE: u32 = 20;
/// Largest accepted page size.
const MAX_PER_PAGE: u32 = 100;

/// A stored document record. `storage_id` keys the blob store and is
/// never exposed outside the vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub original_name: String,
    pub size: u64,
    pub content_type: String,
    pub encryption_algo: String,
    pub is_encrypted: bool,
    pub storage_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A document visible to a recipient through a share, with the owner's
/// name and the granted permission attached.
#[derive(Debug, Clone)]
pub struct SharedDocument {
    pub document: StoredDocument,
    pub owner_name: String,
    pub permission: SharePermission,
    pub shared_at: DateTime<Utc>,
}

/// Document operations over the vault storage.
pub struct DocumentRegistry<'a> {
    storage: &'a VaultStorage,
    max_upload_bytes: u64,
}

impl<'a> DocumentRegistry<'a> {
    pub fn new(storage: &'a VaultStorage, max_upload_bytes: u64) -> Self {
        Self {
            storage,
            max_upload_bytes,
        }
    }

    /// Store a new document.
    ///
    /// The blob is written first; if the metadata write then fails the
    /// blob is removed so no orphan survives a failed upload. The display
    /// name falls back to the sanitized original filename.
    pub fn create(
        &self,
        owner_id: Uuid,
        name: Option<&str>,
        original_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> VaultResult<StoredDocument> {
        validate::validate_content_type(content_type)?;
        validate::validate_file_size(data.len() as u64, self.max_upload_bytes)?;

        let original_name = validate::sanitize_filename(original_name)?;
        let name = match name {
            Some(n) if !n.is_empty() => validate::sanitize_filename(n)?,
            _ => original_name.clone(),
        };

        let now = Utc::now();
        let document = StoredDocument {
            id: Uuid::new_v4(),
            owner_id,
            name,
            original_name,
            size: data.len() as u64,
            content_type: content_type.to_string(),
            encryption_algo: ENCRYPTION_ALGO.to_string(),
            is_encrypted: false,
            // Generated, never derived from caller input.
            storage_id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let blob_path = self.storage.paths().blob(&document.storage_id);
        self.storage.write_raw(&blob_path, data)?;

        let meta_path = self.storage.paths().document(&document.id.to_string());
        if let Err(e) = self.storage.write_json(&meta_path, &document) {
            // Compensating cleanup: the blob must not outlive a failed upload.
            if let Err(cleanup) = self.storage.delete(&blob_path) {
                tracing::warn!(
                    storage_id = %document.storage_id,
                    error = %cleanup,
                    "failed to remove blob after metadata write failure"
                );
            }
            return Err(e.into());
        }

        Ok(document)
    }

    /// Load a document. Soft-deleted records are not found.
    pub fn get_by_id(&self, document_id: Uuid) -> VaultResult<StoredDocument> {
        let path = self.storage.paths().document(&document_id.to_string());
        let document: StoredDocument = match self.storage.read_json(&path) {
            Ok(doc) => doc,
            Err(StorageError::NotFound(_)) => return Err(VaultError::DocumentNotFound),
            Err(e) => return Err(e.into()),
        };
        if document.deleted_at.is_some() {
            return Err(VaultError::DocumentNotFound);
        }
        Ok(document)
    }

    /// A caller-visible document: not deleted and the caller holds some
    /// access level. Returns the document together with that level.
    pub fn get_for_user(
        &self,
        document_id: Uuid,
        user_id: Uuid,
    ) -> VaultResult<(StoredDocument, AccessLevel)> {
        let document = self.get_by_id(document_id)?;
        let level = SharingEngine::new(self.storage)
            .access_for(&document, user_id)?
            .ok_or(VaultError::AccessDenied)?;
        Ok((document, level))
    }

    /// List the caller's own documents, newest first.
    pub fn list_by_owner(
        &self,
        owner_id: Uuid,
        page: i64,
        per_page: i64,
    ) -> VaultResult<(Vec<StoredDocument>, u64)> {
        let mut documents: Vec<StoredDocument> = self
            .all_documents()?
            .into_iter()
            .filter(|d| d.owner_id == owner_id && d.deleted_at.is_none())
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = documents.len() as u64;
        Ok((paginate(documents, page, per_page), total))
    }

    /// List documents with an active share to the caller, most recently
    /// shared first.
    pub fn list_shared_with(
        &self,
        user_id: Uuid,
        page: i64,
        per_page: i64,
    ) -> VaultResult<(Vec<SharedDocument>, u64)> {
        let sharing = SharingEngine::new(self.storage);
        let users = UserRegistry::new(self.storage);

        let mut shared = Vec::new();
        for share in sharing.shares_for_recipient(user_id)? {
            let document = match self.get_by_id(share.document_id) {
                Ok(doc) => doc,
                // The underlying document was deleted after the grant.
                Err(VaultError::DocumentNotFound) => continue,
                Err(e) => return Err(e),
            };
            let owner_name = match users.get_by_id(document.owner_id) {
                Ok(owner) => owner.name,
                Err(VaultError::UserNotFound) => String::new(),
                Err(e) => return Err(e),
            };
            shared.push(SharedDocument {
                document,
                owner_name,
                permission: share.permission,
                shared_at: share.created_at,
            });
        }
        shared.sort_by(|a, b| b.shared_at.cmp(&a.shared_at));

        let total = shared.len() as u64;
        Ok((paginate(shared, page, per_page), total))
    }

    /// Rename a document. Requires edit or owner access.
    pub fn rename(
        &self,
        document_id: Uuid,
        caller_id: Uuid,
        new_name: &str,
    ) -> VaultResult<StoredDocument> {
        let (mut document, level) = self.get_for_user(document_id, caller_id)?;
        if level < AccessLevel::Edit {
            return Err(VaultError::AccessDenied);
        }

        document.name = validate::sanitize_filename(new_name)?;
        document.updated_at = Utc::now();

        let path = self.storage.paths().document(&document.id.to_string());
        self.storage.write_json(&path, &document)?;
        Ok(document)
    }

    /// Soft-delete a document (owner only).
    ///
    /// The `deleted_at` mark is authoritative; blob removal afterwards is
    /// best effort and a failure there only logs a warning.
    pub fn delete(&self, document_id: Uuid, caller_id: Uuid) -> VaultResult<()> {
        let mut document = self.get_by_id(document_id)?;
        if document.owner_id != caller_id {
            return Err(VaultError::AccessDenied);
        }

        document.deleted_at = Some(Utc::now());
        let path = self.storage.paths().document(&document.id.to_string());
        self.storage.write_json(&path, &document)?;

        let blob_path = self.storage.paths().blob(&document.storage_id);
        match self.storage.delete(&blob_path) {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => {
                tracing::warn!(
                    document_id = %document.id,
                    error = %e,
                    "failed to remove blob for deleted document"
                );
            }
        }

        Ok(())
    }

    /// Read a document's content. Any access level suffices.
    pub fn open_content(
        &self,
        document_id: Uuid,
        caller_id: Uuid,
    ) -> VaultResult<(StoredDocument, Vec<u8>)> {
        let (document, _level) = self.get_for_user(document_id, caller_id)?;
        let blob_path = self.storage.paths().blob(&document.storage_id);
        let data = self.storage.read_raw(&blob_path)?;
        Ok((document, data))
    }

    fn all_documents(&self) -> VaultResult<Vec<StoredDocument>> {
        let mut documents = Vec::new();
        for id in self
            .storage
            .list_files(self.storage.paths().documents_dir(), "json")?
        {
            let path = self.storage.paths().document(&id);
            match self.storage.read_json::<StoredDocument>(&path) {
                Ok(doc) => documents.push(doc),
                Err(StorageError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(documents)
    }
}

/// Clamp paging inputs and slice out the requested page. A page below 1
/// clamps to 1; a page size outside (0, 100] falls back to 20.
pub fn clamp_paging(page: i64, per_page: i64) -> (u32, u32) {
    let page = u32::try_from(page.max(1)).unwrap_or(u32::MAX);
    let per_page = if per_page < 1 || per_page > MAX_PER_PAGE as i64 {
        DEFAULT_PER_PAGE
    } else {
        per_page as u32
    };
    (page, per_page)
}

fn paginate<T>(items: Vec<T>, page: i64, per_page: i64) -> Vec<T> {
    let (page, per_page) = clamp_paging(page, per_page);
    let offset = ((page - 1) as usize).saturating_mul(per_page as usize);
    items
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect()
}
