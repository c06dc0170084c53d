// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::middleware::parse_bearer;
use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Prefers the identity the middleware already bound into request
/// extensions; falls back to verifying the Authorization header itself
/// so handlers work on routes the middleware does not wrap.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = parse_bearer(header)?;
        let user = state.tokens.verify(token)?;

        Ok(Auth(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::storage::{StoragePaths, VaultStorage};
    use axum::http::Request;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir");
        let storage = VaultStorage::open(StoragePaths::new(temp_dir.path())).expect("open storage");
        let tokens = TokenService::new("extractor-test-secret").expect("token service");
        (AppState::new(storage, tokens, 1024 * 1024), temp_dir)
    }

    #[tokio::test]
    async fn extractor_requires_auth_header() {
        let (state, _temp_dir) = create_test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn extractor_verifies_a_real_token() {
        let (state, _temp_dir) = create_test_state();
        let user_id = Uuid::new_v4();
        let token = state.tokens.issue(user_id, "alice@example.com").unwrap();

        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        let Auth(user) = result.unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn extractor_rejects_bad_scheme_and_forged_token() {
        let (state, _temp_dir) = create_test_state();

        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic abc")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));

        let forged = TokenService::new("some-other-secret")
            .unwrap()
            .issue(Uuid::new_v4(), "mallory@example.com")
            .unwrap();
        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {forged}"))
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn extractor_prefers_extensions() {
        let (state, _temp_dir) = create_test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let bound = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "middleware@example.com".to_string(),
        };
        parts.extensions.insert(bound.clone());

        let result = Auth::from_request_parts(&mut parts, &state).await;
        let Auth(user) = result.unwrap();
        assert_eq!(user.user_id, bound.user_id);
        assert_eq!(user.email, "middleware@example.com");
    }
}
