// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

//! API boundary errors.
//!
//! Every handler failure becomes an `ApiError`: an HTTP status, a stable
//! machine-readable code, and a human-readable message. Internal detail
//! is logged, never echoed to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::vault::VaultError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    pub fn access_denied() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "access_denied",
            "You do not have permission to perform this action",
        )
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "Invalid email or password",
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal server error",
        )
    }
}

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::UserNotFound
            | VaultError::DocumentNotFound
            | VaultError::ShareNotFound => ApiError::not_found(err.to_string()),
            VaultError::UserExists => ApiError::new(
                StatusCode::CONFLICT,
                "user_exists",
                "A user with this email already exists",
            ),
            VaultError::InvalidPassword => ApiError::invalid_credentials(),
            VaultError::AccessDenied => ApiError::access_denied(),
            VaultError::Validation(message) => ApiError::validation(message),
            VaultError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                ApiError::internal()
            }
            VaultError::Storage(e) => {
                tracing::error!(error = %e, "storage error");
                ApiError::internal()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenCreation => {
                tracing::error!("token signing failed");
                ApiError::internal()
            }
            other => {
                let message = other.to_string();
                ApiError::new(other.status_code(), other.error_code(), message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
