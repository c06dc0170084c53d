// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Docvault Authors

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        total_pages, DocumentPage, DocumentResponse, PageQuery, RenameDocumentRequest,
        ShareRequest, ShareResponse, SharedDocumentPage,
    },
    state::AppState,
    vault::{clamp_paging, DocumentRegistry, SharingEngine},
};

/// One upload parsed out of a multipart body.
struct Upload {
    name: Option<String>,
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

/// Pull the `file` part (and optional `name` part) out of the form.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut name = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("malformed multipart body"))?
    {
        match field.name() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::validation("malformed 'name' field"))?;
                name = Some(value);
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .ok_or_else(|| ApiError::validation("file field must carry a filename"))?
                    .to_string();
                let content_type = field
                    .content_type()
                    .ok_or_else(|| ApiError::validation("file field must carry a content type"))?
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::validation("failed to read file data"))?
                    .to_vec();
                file = Some((file_name, content_type, data));
            }
            _ => {}
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| ApiError::validation("missing 'file' field"))?;
    Ok(Upload {
        name,
        file_name,
        content_type,
        data,
    })
}

#[utoipa::path(
    post,
    path = "/documents",
    tag = "Documents",
    security(("bearer" = [])),
    responses(
        (status = 201, body = DocumentResponse),
        (status = 400, description = "Rejected upload"),
        (status = 401)
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    Auth(user): Auth,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    let upload = read_upload(multipart).await?;

    let docs = DocumentRegistry::new(&state.storage, state.max_upload_bytes);
    let document = docs.create(
        user.user_id,
        upload.name.as_deref(),
        &upload.file_name,
        &upload.content_type,
        &upload.data,
    )?;

    tracing::info!(document_id = %document.id, owner = %user.user_id, "document uploaded");
    Ok((StatusCode::CREATED, Json(document.into())))
}

#[utoipa::path(
    get,
    path = "/documents",
    params(PageQuery),
    tag = "Documents",
    security(("bearer" = [])),
    responses((status = 200, body = DocumentPage), (status = 401))
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Auth(user): Auth,
    Query(params): Query<PageQuery>,
) -> Result<Json<DocumentPage>, ApiError> {
    let docs = DocumentRegistry::new(&state.storage, state.max_upload_bytes);
    let (items, total) = docs.list_by_owner(user.user_id, params.page(), params.per_page())?;

    let (page, per_page) = clamp_paging(params.page(), params.per_page());
    Ok(Json(DocumentPage {
        data: items.into_iter().map(Into::into).collect(),
        total,
        page,
        per_page,
        total_pages: total_pages(total, per_page),
    }))
}

#[utoipa::path(
    get,
    path = "/shared",
    params(PageQuery),
    tag = "Documents",
    security(("bearer" = [])),
    responses((status = 200, body = SharedDocumentPage), (status = 401))
)]
pub async fn list_shared(
    State(state): State<AppState>,
    Auth(user): Auth,
    Query(params): Query<PageQuery>,
) -> Result<Json<SharedDocumentPage>, ApiError> {
    let docs = DocumentRegistry::new(&state.storage, state.max_upload_bytes);
    let (items, total) = docs.list_shared_with(user.user_id, params.page(), params.per_page())?;

    let (page, per_page) = clamp_paging(params.page(), params.per_page());
    Ok(Json(SharedDocumentPage {
        data: items.into_iter().map(Into::into).collect(),
        total,
        page,
        per_page,
        total_pages: total_pages(total, per_page),
    }))
}

#[utoipa::path(
    get,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    tag = "Documents",
    security(("bearer" = [])),
    responses((status = 200, body = DocumentResponse), (status = 403), (status = 404))
)]
pub async fn get_document(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let docs = DocumentRegistry::new(&state.storage, state.max_upload_bytes);
    let (document, _level) = docs.get_for_user(id, user.user_id)?;
    Ok(Json(document.into()))
}

#[utoipa::path(
    get,
    path = "/documents/{id}/download",
    params(("id" = Uuid, Path, description = "Document id")),
    tag = "Documents",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Document content"),
        (status = 403),
        (status = 404)
    )
)]
pub async fn download_document(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let docs = DocumentRegistry::new(&state.storage, state.max_upload_bytes);
    let (document, data) = docs.open_content(id, user.user_id)?;

    // The name was sanitized at upload time, so it is header-safe.
    let disposition = format!("attachment; filename=\"{}\"", document.name);
    Ok((
        [
            (header::CONTENT_TYPE, document.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

#[utoipa::path(
    patch,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    request_body = RenameDocumentRequest,
    tag = "Documents",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DocumentResponse),
        (status = 400),
        (status = 403),
        (status = 404)
    )
)]
pub async fn rename_document(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<Uuid>,
    Json(request): Json<RenameDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let docs = DocumentRegistry::new(&state.storage, state.max_upload_bytes);
    let document = docs.rename(id, user.user_id, &request.name)?;
    Ok(Json(document.into()))
}

#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    tag = "Documents",
    security(("bearer" = [])),
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn delete_document(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let docs = DocumentRegistry::new(&state.storage, state.max_upload_bytes);
    docs.delete(id, user.user_id)?;
    tracing::info!(document_id = %id, owner = %user.user_id, "document deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/documents/{id}/share",
    params(("id" = Uuid, Path, description = "Document id")),
    request_body = ShareRequest,
    tag = "Sharing",
    security(("bearer" = [])),
    responses(
        (status = 200, body = ShareResponse),
        (status = 400),
        (status = 403),
        (status = 404, description = "Document or recipient not found")
    )
)]
pub async fn share_document(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<Uuid>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<ShareResponse>, ApiError> {
    let permission = request.permission.parse()?;
    let sharing = SharingEngine::new(&state.storage);
    let share = sharing.share(
        id,
        user.user_id,
        &request.email,
        permission,
        request.expires_at,
    )?;

    tracing::info!(
        document_id = %id,
        shared_with = %share.shared_with,
        permission = %share.permission,
        "document shared"
    );
    Ok(Json(share.into()))
}

#[utoipa::path(
    delete,
    path = "/documents/{id}/share/{user_id}",
    params(
        ("id" = Uuid, Path, description = "Document id"),
        ("user_id" = Uuid, Path, description = "Recipient whose access to revoke")
    ),
    tag = "Sharing",
    security(("bearer" = [])),
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn remove_share(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path((id, recipient_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let sharing = SharingEngine::new(&state.storage);
    sharing.remove_share(id, user.user_id, recipient_id)?;
    Ok(StatusCode::NO_CONTENT)
}
