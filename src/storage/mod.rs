// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Storage layer: on-disk layout and filesystem persistence.

mod paths;
mod vault_fs;

pub use paths::{StoragePaths, DATA_ROOT};
pub use vault_fs::{StorageError, StorageResult, VaultStorage};
