// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Authentication middleware for the protected router subtree.
//!
//! Verifies the bearer token and inserts the resulting
//! [`AuthenticatedUser`] into request extensions. Requests that fail at
//! any step are rejected with 401 before a handler runs.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extract the token from an `Authorization` header value.
///
/// Strict form: exactly two space-separated segments, scheme
/// case-insensitively `bearer`, non-empty token.
pub fn parse_bearer(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split(' ');
    let scheme = parts.next().unwrap_or("");
    let token = parts.next().unwrap_or("");

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Authentication middleware.
///
/// Apply with `axum::middleware::from_fn_with_state(state, require_auth)`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => value,
        None => return AuthError::MissingAuthHeader.into_response(),
    };

    let header = match header.to_str() {
        Ok(s) => s,
        Err(_) => return AuthError::InvalidAuthHeader.into_response(),
    };

    let token = match parse_bearer(header) {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };

    match state.tokens.verify(token) {
        Ok(user) => {
            request.extensions_mut().insert::<AuthenticatedUser>(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bearer_accepts_the_strict_form() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        // Scheme comparison is case-insensitive.
        assert_eq!(parse_bearer("bearer tok").unwrap(), "tok");
        assert_eq!(parse_bearer("BEARER tok").unwrap(), "tok");
    }

    #[test]
    fn parse_bearer_rejects_everything_else() {
        assert!(parse_bearer("").is_err());
        assert!(parse_bearer("Bearer").is_err());
        assert!(parse_bearer("Bearer ").is_err());
        assert!(parse_bearer("Basic dXNlcjpwYXNz").is_err());
        assert!(parse_bearer("Bearer tok extra").is_err());
        assert!(parse_bearer("tok").is_err());
    }
}
