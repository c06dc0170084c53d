// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserResponse},
    state::AppState,
    vault::{UserRegistry, VaultError},
};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, body = AuthResponse),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let users = UserRegistry::new(&state.storage);
    let user = users.create(&request.email, &request.password, &request.name)?;

    tracing::info!(user_id = %user.id, "user registered");
    let token = state.tokens.issue(user.id, &user.email)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, body = AuthResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let users = UserRegistry::new(&state.storage);
    let user = users
        .authenticate(&request.email, &request.password)
        .map_err(|e| match e {
            // One response for both, so probing cannot tell a wrong
            // password from an unknown address.
            VaultError::UserNotFound | VaultError::InvalidPassword => {
                ApiError::invalid_credentials()
            }
            other => other.into(),
        })?;

    let token = state.tokens.issue(user.id, &user.email)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses((status = 200, body = UserResponse), (status = 401))
)]
pub async fn me(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<UserResponse>, ApiError> {
    let account = UserRegistry::new(&state.storage).get_by_id(user.user_id)?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    patch,
    path = "/auth/me",
    request_body = UpdateProfileRequest,
    tag = "Auth",
    security(("bearer" = [])),
    responses((status = 200, body = UserResponse), (status = 400), (status = 401))
)]
pub async fn update_me(
    State(state): State<AppState>,
    Auth(user): Auth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let account = UserRegistry::new(&state.storage).update_name(user.user_id, &request.name)?;
    Ok(Json(account.into()))
}
