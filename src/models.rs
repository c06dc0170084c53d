// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Request and response DTOs for the HTTP API.
//!
//! Stored records never cross the boundary directly: the response types
//! here omit password hashes, storage identifiers, and tombstones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::vault::{SharePermission, SharedDocument, StoredDocument, StoredShare, StoredUser};

// ========== Requests ==========

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameDocumentRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShareRequest {
    /// Recipient's email address
    pub email: String,
    /// `view` or `edit`
    pub permission: String,
    /// Optional expiry; omitted means the grant never expires
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Pagination query parameters. Out-of-range values are clamped, not
/// rejected.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20)
    }
}

// ========== Responses ==========

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub original_name: String,
    pub size: u64,
    pub content_type: String,
    pub encryption_algo: String,
    pub is_encrypted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredDocument> for DocumentResponse {
    fn from(doc: StoredDocument) -> Self {
        Self {
            id: doc.id,
            owner_id: doc.owner_id,
            name: doc.name,
            original_name: doc.original_name,
            size: doc.size,
            content_type: doc.content_type,
            encryption_algo: doc.encryption_algo,
            is_encrypted: doc.is_encrypted,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// A document as seen by a share recipient.
#[derive(Debug, Serialize, ToSchema)]
pub struct SharedDocumentResponse {
    #[serde(flatten)]
    pub document: DocumentResponse,
    pub owner_name: String,
    pub permission: SharePermission,
    pub shared_at: DateTime<Utc>,
}

impl From<SharedDocument> for SharedDocumentResponse {
    fn from(shared: SharedDocument) -> Self {
        Self {
            document: shared.document.into(),
            owner_name: shared.owner_name,
            permission: shared.permission,
            shared_at: shared.shared_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShareResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub shared_with: Uuid,
    pub permission: SharePermission,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<StoredShare> for ShareResponse {
    fn from(share: StoredShare) -> Self {
        Self {
            id: share.id,
            document_id: share.document_id,
            shared_with: share.shared_with,
            permission: share.permission,
            expires_at: share.expires_at,
            created_at: share.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentPage {
    pub data: Vec<DocumentResponse>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SharedDocumentPage {
    pub data: Vec<SharedDocumentResponse>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

/// Number of pages needed for `total` items at `per_page` each.
pub fn total_pages(total: u64, per_page: u32) -> u64 {
    total.div_ceil(per_page as u64)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
