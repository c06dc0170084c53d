// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Domain errors for the vault services.

use thiserror::Error;

use crate::storage::StorageError;

/// Error type for vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No user with the given id or email
    #[error("user not found")]
    UserNotFound,
    /// Registration attempted with an email that is already taken
    #[error("user with this email already exists")]
    UserExists,
    /// Password does not match the stored hash
    #[error("invalid password")]
    InvalidPassword,
    /// No document with the given id, or it has been deleted
    #[error("document not found")]
    DocumentNotFound,
    /// No active share for the (document, recipient) pair
    #[error("share not found")]
    ShareNotFound,
    /// Caller lacks the permission the operation requires
    #[error("access denied")]
    AccessDenied,
    /// Input failed validation
    #[error("{0}")]
    Validation(String),
    /// Unexpected internal failure (detail logged, not echoed)
    #[error("internal error: {0}")]
    Internal(String),
    /// Storage layer failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    pub fn validation(message: impl Into<String>) -> Self {
        VaultError::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        VaultError::Internal(message.into())
    }
}
