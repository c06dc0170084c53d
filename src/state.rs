// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Shared application state.

use crate::auth::TokenService;
use crate::storage::VaultStorage;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Vault storage backend
    pub storage: VaultStorage,
    /// Session token service
    pub tokens: TokenService,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: u64,
}

impl AppState {
    pub fn new(storage: VaultStorage, tokens: TokenService, max_upload_bytes: u64) -> Self {
        Self {
            storage,
            tokens,
            max_upload_bytes,
        }
    }
}
