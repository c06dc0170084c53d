// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    models::{
        AuthResponse, DocumentPage, DocumentResponse, ErrorResponse, HealthResponse,
        LoginRequest, RegisterRequest, RenameDocumentRequest, ShareRequest, ShareResponse,
        SharedDocumentPage, SharedDocumentResponse, UpdateProfileRequest, UserResponse,
    },
    state::AppState,
    vault::SharePermission,
};

pub mod auth;
pub mod documents;
pub mod health;

/// Headroom on top of the upload limit for multipart framing overhead.
const BODY_LIMIT_MARGIN: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/me", get(auth::me).patch(auth::update_me))
        .route(
            "/documents",
            get(documents::list_documents).post(documents::upload_document),
        )
        .route(
            "/documents/{id}",
            get(documents::get_document)
                .patch(documents::rename_document)
                .delete(documents::delete_document),
        )
        .route("/documents/{id}/download", get(documents::download_document))
        .route("/documents/{id}/share", post(documents::share_document))
        .route(
            "/documents/{id}/share/{user_id}",
            delete(documents::remove_share),
        )
        .route("/shared", get(documents::list_shared))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let body_limit = state.max_upload_bytes as usize + BODY_LIMIT_MARGIN;

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::me,
        auth::update_me,
        documents::upload_document,
        documents::list_documents,
        documents::list_shared,
        documents::get_document,
        documents::download_document,
        documents::rename_document,
        documents::delete_document,
        documents::share_document,
        documents::remove_share
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            RenameDocumentRequest,
            ShareRequest,
            AuthResponse,
            UserResponse,
            DocumentResponse,
            SharedDocumentResponse,
            DocumentPage,
            SharedDocumentPage,
            ShareResponse,
            SharePermission,
            HealthResponse,
            ErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and storage checks"),
        (name = "Auth", description = "Registration, login, profile"),
        (name = "Documents", description = "Upload, listing, download, lifecycle"),
        (name = "Sharing", description = "Share grants and revocation")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenService;
    use crate::storage::{StoragePaths, VaultStorage};
    use tempfile::TempDir;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let dir = TempDir::new().unwrap();
        let storage = VaultStorage::open(StoragePaths::new(dir.path())).unwrap();
        let tokens = TokenService::new("router-test-secret").unwrap();
        let app = router(AppState::new(storage, tokens, 1024 * 1024));
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[test]
    fn openapi_document_generates() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("openapi serializes");
        assert!(json.contains("/documents/{id}/share"));
        assert!(json.contains("/auth/register"));
    }
}
