// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Docvault - Secure Document Vault Service
//!
//! Users register, upload documents, and share them with other users
//! under view/edit permissions with optional expiry. Authentication is
//! stateless HS256 bearer tokens.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token lifecycle and the request gate
//! - `storage` - On-disk layout and filesystem persistence
//! - `vault` - Domain services (users, documents, sharing)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod vault;
