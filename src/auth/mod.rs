// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Authentication: token lifecycle and the request gate.

mod claims;
mod error;
pub mod extractor;
pub mod middleware;
mod token;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_auth;
pub use token::{EmptySecret, TokenService};
