// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Token claims and the verified identity they carry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for a vault session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: Uuid,
    /// Account email at issue time
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Not valid before (unix seconds)
    pub nbf: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// The identity bound to a request after token verification.
///
/// Inserted into request extensions by the auth middleware and read by
/// the `Auth` extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}
