// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Sharing grants and the authorization predicate.
//!
//! A grant lives at `shares/{document_id}/{recipient_id}.json`, so there
//! can only ever be one row per (document, recipient) pair and an upsert
//! is a single atomic write. Expiry is lazy: expired grants behave as
//! absent at read time and are never swept.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::documents::StoredDocument;
use super::error::{VaultError, VaultResult};
use super::users::UserRegistry;
use crate::storage::{StorageError, VaultStorage};

/// Permission granted by a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    View,
    Edit,
}

impl fmt::Display for SharePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharePermission::View => write!(f, "view"),
            SharePermission::Edit => write!(f, "edit"),
        }
    }
}

impl FromStr for SharePermission {
    type Err = VaultError;

    /// Strict: exactly `"view"` or `"edit"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(SharePermission::View),
            "edit" => Ok(SharePermission::Edit),
            other => Err(VaultError::validation(format!(
                "permission must be 'view' or 'edit', got '{other}'"
            ))),
        }
    }
}

/// What a user may do with a document. Ordered: `View < Edit < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessLevel {
    View,
    Edit,
    Owner,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::View => "view",
            AccessLevel::Edit => "edit",
            AccessLevel::Owner => "owner",
        }
    }
}

impl From<SharePermission> for AccessLevel {
    fn from(permission: SharePermission) -> Self {
        match permission {
            SharePermission::View => AccessLevel::View,
            SharePermission::Edit => AccessLevel::Edit,
        }
    }
}

/// A stored sharing grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredShare {
    pub id: Uuid,
    pub document_id: Uuid,
    pub shared_by: Uuid,
    pub shared_with: Uuid,
    pub permission: SharePermission,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl StoredShare {
    /// A grant counts only while unexpired; `None` means it never expires.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expiry| expiry > now)
    }
}

/// Sharing operations and the single authorization predicate.
pub struct SharingEngine<'a> {
    storage: &'a VaultStorage,
}

impl<'a> SharingEngine<'a> {
    pub fn new(storage: &'a VaultStorage) -> Self {
        Self { storage }
    }

    /// Grant or update access for a recipient (owner only).
    ///
    /// Re-sharing the same pair replaces the permission and expiry in
    /// place; the write is a single atomic rename, so no second row can
    /// exist for the pair.
    pub fn share(
        &self,
        document_id: Uuid,
        owner_id: Uuid,
        recipient_email: &str,
        permission: SharePermission,
        expires_at: Option<DateTime<Utc>>,
    ) -> VaultResult<StoredShare> {
        let document = self.load_document(document_id)?;
        if document.owner_id != owner_id {
            return Err(VaultError::AccessDenied);
        }

        let recipient = UserRegistry::new(self.storage).get_by_email(recipient_email)?;
        if recipient.id == owner_id {
            return Err(VaultError::validation(
                "cannot share a document with yourself",
            ));
        }

        let path = self
            .storage
            .paths()
            .share(&document_id.to_string(), &recipient.id.to_string());

        // Keep the original grant identity when upgrading an existing row.
        let existing: Option<StoredShare> = match self.storage.read_json(&path) {
            Ok(share) => Some(share),
            Err(StorageError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        let share = StoredShare {
            id: existing.as_ref().map(|s| s.id).unwrap_or_else(Uuid::new_v4),
            document_id,
            shared_by: owner_id,
            shared_with: recipient.id,
            permission,
            expires_at,
            created_at: existing
                .as_ref()
                .map(|s| s.created_at)
                .unwrap_or_else(Utc::now),
        };

        self.storage.write_json(&path, &share)?;
        Ok(share)
    }

    /// Revoke a recipient's access (owner only).
    pub fn remove_share(
        &self,
        document_id: Uuid,
        owner_id: Uuid,
        recipient_id: Uuid,
    ) -> VaultResult<()> {
        let document = self.load_document(document_id)?;
        if document.owner_id != owner_id {
            return Err(VaultError::AccessDenied);
        }

        let path = self
            .storage
            .paths()
            .share(&document_id.to_string(), &recipient_id.to_string());
        match self.storage.delete(&path) {
            Ok(()) => Ok(()),
            Err(StorageError::NotFound(_)) => Err(VaultError::ShareNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// The single authorization predicate.
    ///
    /// Owner wins outright; otherwise an active grant yields its level;
    /// expired or absent grants yield `None`.
    pub fn can_access(&self, document_id: Uuid, user_id: Uuid) -> VaultResult<Option<AccessLevel>> {
        let document = self.load_document(document_id)?;
        self.access_for(&document, user_id)
    }

    /// Same predicate for a document the caller already loaded.
    pub fn access_for(
        &self,
        document: &StoredDocument,
        user_id: Uuid,
    ) -> VaultResult<Option<AccessLevel>> {
        if document.owner_id == user_id {
            return Ok(Some(AccessLevel::Owner));
        }

        match self.get_share(document.id, user_id)? {
            Some(share) if share.is_active(Utc::now()) => Ok(Some(share.permission.into())),
            _ => Ok(None),
        }
    }

    /// Read the grant row for a pair, expired or not.
    pub fn get_share(&self, document_id: Uuid, recipient_id: Uuid) -> VaultResult<Option<StoredShare>> {
        let path = self
            .storage
            .paths()
            .share(&document_id.to_string(), &recipient_id.to_string());
        match self.storage.read_json(&path) {
            Ok(share) => Ok(Some(share)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All active grants held by a recipient, across documents.
    pub fn shares_for_recipient(&self, recipient_id: Uuid) -> VaultResult<Vec<StoredShare>> {
        let now = Utc::now();
        let recipient_file = format!("{recipient_id}.json");
        let mut shares = Vec::new();

        for document_dir in self.storage.list_dirs(self.storage.paths().shares_dir())? {
            let path = self
                .storage
                .paths()
                .document_shares_dir(&document_dir)
                .join(&recipient_file);
            match self.storage.read_json::<StoredShare>(&path) {
                Ok(share) if share.is_active(now) => shares.push(share),
                Ok(_) => {}
                Err(StorageError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(shares)
    }

    fn load_document(&self, document_id: Uuid) -> VaultResult<StoredDocument> {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use crate::vault::documents::DocumentRegistry;
    use crate::vault::users::StoredUser;
    use chrono::Duration;
    use tempfile::TempDir;

    fn test_storage() -> (VaultStorage, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let storage = VaultStorage::open(StoragePaths::new(dir.path())).expect("open storage");
        (storage, dir)
    }

    fn add_user(storage: &VaultStorage, email: &str) -> StoredUser {
        UserRegistry::new(storage)
            .create(email, "long enough password", "Someone")
            .unwrap()
    }

    fn add_document(storage: &VaultStorage, owner: Uuid) -> StoredDocument {
        DocumentRegistry::new(storage, 1024 * 1024)
            .create(owner, None, "notes.txt", "text/plain", b"hello")
            .unwrap()
    }

    #[test]
    fn permission_parses_strictly() {
        assert_eq!("view".parse::<SharePermission>().unwrap(), SharePermission::View);
        assert_eq!("edit".parse::<SharePermission>().unwrap(), SharePermission::Edit);
        assert!("View".parse::<SharePermission>().is_err());
        assert!("owner".parse::<SharePermission>().is_err());
        assert!("".parse::<SharePermission>().is_err());
    }

    #[test]
    fn access_levels_are_ordered() {
        assert!(AccessLevel::Owner > AccessLevel::Edit);
        assert!(AccessLevel::Edit > AccessLevel::View);
    }

    #[test]
    fn owner_always_has_owner_access() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        let level = sharing.can_access(doc.id, alice.id).unwrap();
        assert_eq!(level, Some(AccessLevel::Owner));
    }

    #[test]
    fn stranger_has_no_access() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let mallory = add_user(&storage, "mallory@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        let level = sharing.can_access(doc.id, mallory.id).unwrap();
        assert_eq!(level, None);
    }

    #[test]
    fn share_grants_the_requested_level() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let bob = add_user(&storage, "bob@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        sharing
            .share(doc.id, alice.id, "bob@example.com", SharePermission::View, None)
            .unwrap();

        let level = sharing.can_access(doc.id, bob.id).unwrap();
        assert_eq!(level, Some(AccessLevel::View));
    }

    #[test]
    fn reshare_upgrades_the_single_row() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let bob = add_user(&storage, "bob@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        let first = sharing
            .share(doc.id, alice.id, "bob@example.com", SharePermission::View, None)
            .unwrap();
        let second = sharing
            .share(doc.id, alice.id, "bob@example.com", SharePermission::Edit, None)
            .unwrap();

        // Same row, upgraded in place.
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);

        let level = sharing.can_access(doc.id, bob.id).unwrap();
        assert_eq!(level, Some(AccessLevel::Edit));

        let stored = sharing.get_share(doc.id, bob.id).unwrap().unwrap();
        assert_eq!(stored.permission, SharePermission::Edit);
    }

    #[test]
    fn expired_share_behaves_as_absent() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let bob = add_user(&storage, "bob@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        let past = Utc::now() - Duration::hours(1);
        sharing
            .share(doc.id, alice.id, "bob@example.com", SharePermission::Edit, Some(past))
            .unwrap();

        assert_eq!(sharing.can_access(doc.id, bob.id).unwrap(), None);
        // The row itself is still there, just inert.
        assert!(sharing.get_share(doc.id, bob.id).unwrap().is_some());
    }

    #[test]
    fn future_expiry_still_grants() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let bob = add_user(&storage, "bob@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        let future = Utc::now() + Duration::hours(1);
        sharing
            .share(doc.id, alice.id, "bob@example.com", SharePermission::View, Some(future))
            .unwrap();

        assert_eq!(
            sharing.can_access(doc.id, bob.id).unwrap(),
            Some(AccessLevel::View)
        );
    }

    #[test]
    fn only_the_owner_can_share_or_revoke() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let bob = add_user(&storage, "bob@example.com");
        let carol = add_user(&storage, "carol@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        let result = sharing.share(doc.id, bob.id, "carol@example.com", SharePermission::View, None);
        assert!(matches!(result, Err(VaultError::AccessDenied)));

        let result = sharing.remove_share(doc.id, bob.id, carol.id);
        assert!(matches!(result, Err(VaultError::AccessDenied)));
    }

    #[test]
    fn self_share_is_a_validation_error() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        let result = sharing.share(doc.id, alice.id, "alice@example.com", SharePermission::View, None);
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn share_with_unknown_recipient_is_user_not_found() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        let result = sharing.share(doc.id, alice.id, "ghost@example.com", SharePermission::View, None);
        assert!(matches!(result, Err(VaultError::UserNotFound)));
    }

    #[test]
    fn revoke_removes_access() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let bob = add_user(&storage, "bob@example.com");
        let doc = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        sharing
            .share(doc.id, alice.id, "bob@example.com", SharePermission::Edit, None)
            .unwrap();
        sharing.remove_share(doc.id, alice.id, bob.id).unwrap();

        assert_eq!(sharing.can_access(doc.id, bob.id).unwrap(), None);

        // Revoking again finds no row.
        let result = sharing.remove_share(doc.id, alice.id, bob.id);
        assert!(matches!(result, Err(VaultError::ShareNotFound)));
    }

    #[test]
    fn shares_for_recipient_skips_expired() {
        let (storage, _dir) = test_storage();
        let alice = add_user(&storage, "alice@example.com");
        let bob = add_user(&storage, "bob@example.com");
        let doc_a = add_document(&storage, alice.id);
        let doc_b = add_document(&storage, alice.id);

        let sharing = SharingEngine::new(&storage);
        sharing
            .share(doc_a.id, alice.id, "bob@example.com", SharePermission::View, None)
            .unwrap();
        let past = Utc::now() - Duration::minutes(5);
        sharing
            .share(doc_b.id, alice.id, "bob@example.com", SharePermission::Edit, Some(past))
            .unwrap();

        let shares = sharing.shares_for_recipient(bob.id).unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].document_id, doc_a.id);
    }
}
