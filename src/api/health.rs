// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

use axum::{extract::State, http::StatusCode, Json};

use crate::{models::HealthResponse, state::AppState};

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, body = HealthResponse),
        (status = 503, body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.storage.health_check() {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                storage: "ok".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "storage health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    storage: "unavailable".to_string(),
                }),
            )
        }
    }
}
