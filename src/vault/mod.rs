// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Domain services: users, documents, sharing, validation.

pub mod documents;
pub mod error;
pub mod sharing;
pub mod users;
pub mod validate;

pub use documents::{clamp_paging, DocumentRegistry, SharedDocument, StoredDocument};
pub use error::{VaultError, VaultResult};
pub use sharing::{AccessLevel, SharePermission, SharingEngine, StoredShare};
pub use users::{StoredUser, UserRegistry};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StoragePaths, VaultStorage};
    use tempfile::TempDir;

    // Full lifecycle across the three services, end to end.
    #[test]
    fn share_lifecycle_scenario() {
        let dir = TempDir::new().expect("temp dir");
        let storage = VaultStorage::open(StoragePaths::new(dir.path())).expect("open storage");
        let users = UserRegistry::new(&storage);
        let docs = DocumentRegistry::new(&storage, 1024 * 1024);
        let sharing = SharingEngine::new(&storage);

        let alice = users
            .create("alice@example.com", "alice password", "Alice")
            .unwrap();
        let bob = users
            .create("bob@example.com", "bob password!", "Bob")
            .unwrap();

        // Alice uploads.
        let doc = docs
            .create(
                alice.id,
                Some("Quarterly Report"),
                "report-final.pdf",
                "application/pdf",
                b"%PDF-1.7 fake",
            )
            .unwrap();

        // Bob sees nothing yet.
        assert!(matches!(
            docs.open_content(doc.id, bob.id),
            Err(VaultError::AccessDenied)
        ));

        // Alice shares view access; Bob can now download but not rename.
        sharing
            .share(doc.id, alice.id, "bob@example.com", SharePermission::View, None)
            .unwrap();
        let (_, data) = docs.open_content(doc.id, bob.id).unwrap();
        assert_eq!(data, b"%PDF-1.7 fake");
        assert!(matches!(
            docs.rename(doc.id, bob.id, "mine-now.pdf"),
            Err(VaultError::AccessDenied)
        ));

        // The share shows up in Bob's shared listing.
        let (shared, total) = docs.list_shared_with(bob.id, 1, 20).unwrap();
        assert_eq!(total, 1);
        assert_eq!(shared[0].owner_name, "Alice");

        // Alice revokes; Bob is locked out again.
        sharing.remove_share(doc.id, alice.id, bob.id).unwrap();
        assert!(matches!(
            docs.open_content(doc.id, bob.id),
            Err(VaultError::AccessDenied)
        ));
        let (shared, _) = docs.list_shared_with(bob.id, 1, 20).unwrap();
        assert!(shared.is_empty());

        // Alice still has full access throughout.
        assert_eq!(
            sharing.can_access(doc.id, alice.id).unwrap(),
            Some(AccessLevel::Owner)
        );
    }
}
