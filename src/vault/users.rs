// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! User accounts: registration, credential verification, profile updates.
//!
//! Passwords are stored as argon2 hashes with a per-hash random salt.
//! Email uniqueness is enforced by an index file at `users/by_email/{email}`
//! written with create-new semantics, so concurrent registrations of the
//! same address lose cleanly instead of racing a pre-check.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{VaultError, VaultResult};
use super::validate;
use crate::storage::{StorageError, VaultStorage};

/// A stored user account. The password hash never leaves this module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User account operations over the vault storage.
pub struct UserRegistry<'a> {
    storage: &'a VaultStorage,
}

impl<'a> UserRegistry<'a> {
    pub fn new(storage: &'a VaultStorage) -> Self {
        Self { storage }
    }

    /// Register a new account.
    ///
    /// The email index write is the uniqueness constraint: it either
    /// claims the address atomically or fails with `UserExists`.
    pub fn create(&self, email: &str, password: &str, name: &str) -> VaultResult<StoredUser> {
        let email = validate::validate_email(email)?;
        validate::validate_password(password)?;
        let name = validate::validate_display_name(name)?;

        let password_hash = hash_password(password)?;
        let now = Utc::now();
        let user = StoredUser {
            id: Uuid::new_v4(),
            email: email.clone(),
            password_hash,
            name,
            created_at: now,
            updated_at: now,
        };

        let index_path = self.storage.paths().email_index(&email);
        match self.storage.write_json_new(&index_path, &user.id) {
            Ok(()) => {}
            Err(StorageError::AlreadyExists(_)) => return Err(VaultError::UserExists),
            Err(e) => return Err(e.into()),
        }

        let user_path = self.storage.paths().user(&user.id.to_string());
        if let Err(e) = self.storage.write_json(&user_path, &user) {
            // Release the claimed address so the registration can be retried.
            if let Err(cleanup) = self.storage.delete(&index_path) {
                tracing::warn!(email = %email, error = %cleanup, "failed to roll back email index");
            }
            return Err(e.into());
        }

        Ok(user)
    }

    /// Verify credentials and return the account.
    ///
    /// Callers presenting this to the outside must collapse `UserNotFound`
    /// and `InvalidPassword` into one response.
    pub fn authenticate(&self, email: &str, password: &str) -> VaultResult<StoredUser> {
        let user = self.get_by_email(email)?;
        verify_password(password, &user.password_hash)?;
        Ok(user)
    }

    /// Load a user by id.
    pub fn get_by_id(&self, user_id: Uuid) -> VaultResult<StoredUser> {
        let path = self.storage.paths().user(&user_id.to_string());
        match self.storage.read_json(&path) {
            Ok(user) => Ok(user),
            Err(StorageError::NotFound(_)) => Err(VaultError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Load a user by email via the uniqueness index.
    pub fn get_by_email(&self, email: &str) -> VaultResult<StoredUser> {
        let email = validate::validate_email(email)?;
        let index_path = self.storage.paths().email_index(&email);
        let user_id: Uuid = match self.storage.read_json(&index_path) {
            Ok(id) => id,
            Err(StorageError::NotFound(_)) => return Err(VaultError::UserNotFound),
            Err(e) => return Err(e.into()),
        };
        self.get_by_id(user_id)
    }

    /// Update the display name.
    pub fn update_name(&self, user_id: Uuid, name: &str) -> VaultResult<StoredUser> {
        let name = validate::validate_display_name(name)?;
        let mut user = self.get_by_id(user_id)?;
        user.name = name;
        user.updated_at = Utc::now();

        let path = self.storage.paths().user(&user.id.to_string());
        self.storage.write_json(&path, &user)?;
        Ok(user)
    }
}

fn hash_password(password: &str) -> VaultResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| VaultError::internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> VaultResult<()> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| VaultError::internal(format!("stored hash is unreadable: {e}")))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| VaultError::InvalidPassword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn test_storage() -> (VaultStorage, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let storage = VaultStorage::open(StoragePaths::new(dir.path())).expect("open storage");
        (storage, dir)
    }

    #[test]
    fn create_then_authenticate_roundtrip() {
        let (storage, _dir) = test_storage();
        let users = UserRegistry::new(&storage);

        let created = users
            .create("alice@example.com", "correct horse", "Alice")
            .unwrap();
        assert_eq!(created.email, "alice@example.com");

        let authed = users
            .authenticate("alice@example.com", "correct horse")
            .unwrap();
        assert_eq!(authed.id, created.id);
    }

    #[test]
    fn stored_hash_is_not_the_plaintext() {
        let (storage, _dir) = test_storage();
        let users = UserRegistry::new(&storage);

        let user = users
            .create("alice@example.com", "correct horse", "Alice")
            .unwrap();
        assert_ne!(user.password_hash, "correct horse");
        assert!(!user.password_hash.contains("correct horse"));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (storage, _dir) = test_storage();
        let users = UserRegistry::new(&storage);

        users
            .create("alice@example.com", "password-1", "Alice")
            .unwrap();
        let result = users.create("alice@example.com", "password-2", "Other");
        assert!(matches!(result, Err(VaultError::UserExists)));

        // Case differences collapse to the same address.
        let result = users.create("ALICE@example.com", "password-3", "Third");
        assert!(matches!(result, Err(VaultError::UserExists)));
    }

    #[test]
    fn wrong_password_is_invalid_password() {
        let (storage, _dir) = test_storage();
        let users = UserRegistry::new(&storage);

        users
            .create("alice@example.com", "correct horse", "Alice")
            .unwrap();
        let result = users.authenticate("alice@example.com", "wrong horse");
        assert!(matches!(result, Err(VaultError::InvalidPassword)));
    }

    #[test]
    fn unknown_email_is_user_not_found() {
        let (storage, _dir) = test_storage();
        let users = UserRegistry::new(&storage);

        let result = users.authenticate("nobody@example.com", "whatever-1");
        assert!(matches!(result, Err(VaultError::UserNotFound)));
    }

    #[test]
    fn weak_inputs_are_validation_errors() {
        let (storage, _dir) = test_storage();
        let users = UserRegistry::new(&storage);

        assert!(matches!(
            users.create("not-an-email", "long enough", "Alice"),
            Err(VaultError::Validation(_))
        ));
        assert!(matches!(
            users.create("a@example.com", "short", "Alice"),
            Err(VaultError::Validation(_))
        ));
        assert!(matches!(
            users.create("a@example.com", "long enough", "A"),
            Err(VaultError::Validation(_))
        ));
    }

    #[test]
    fn update_name_persists() {
        let (storage, _dir) = test_storage();
        let users = UserRegistry::new(&storage);

        let user = users
            .create("alice@example.com", "correct horse", "Alice")
            .unwrap();
        let updated = users.update_name(user.id, "Alice B").unwrap();
        assert_eq!(updated.name, "Alice B");

        let reloaded = users.get_by_id(user.id).unwrap();
        assert_eq!(reloaded.name, "Alice B");
        assert!(reloaded.updated_at >= user.updated_at);
    }
}
