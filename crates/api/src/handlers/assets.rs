//! Handlers for binary assets attached to media items.
//!
//! Uploads are stored through the [`ObjectStore`] first and recorded second;
//! deletion removes the object before the record.
//!
//! [`ObjectStore`]: mediahub_core::store::ObjectStore

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediahub_core::asset::{inspect_upload, storage_path, NewAsset};
use mediahub_core::error::CoreError;
use mediahub_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::handlers::media::load_media;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_MIME: &str = "application/octet-stream";

/// GET /api/v1/media/{id}/assets
pub async fn list_assets(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(media_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_media(&state, media_id).await?;
    let assets = state.store.list_assets(media_id).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// POST /api/v1/media/{id}/assets
///
/// Accepts a multipart form with a required `file` field. The MIME type is
/// taken from the part's `Content-Type`.
pub async fn upload_asset(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(media_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    load_media(&state, media_id).await?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.bin").to_string();
        let mime = field.content_type().unwrap_or(DEFAULT_MIME).to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file = Some((file_name, mime, data.to_vec()));
    }

    let (file_name, mime, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let meta = inspect_upload(&mime, &data)?;
    let path = storage_path(media_id, &file_name);
    let public_url = state.objects.put(&path, data, &mime).await?;

    let record = NewAsset {
        media_id,
        storage_path: path.clone(),
        public_url,
        mime_type: mime,
        byte_size: meta.byte_size,
        width: meta.width,
        height: meta.height,
        duration_secs: None,
        checksum: meta.checksum,
        kind: meta.kind,
        uploaded_by: user.user_id,
    };

    let asset = match state.store.insert_asset(record).await {
        Ok(asset) => asset,
        Err(err) => {
            if let Err(cleanup) = state.objects.delete(&path).await {
                tracing::warn!(path = %path, error = %cleanup, "Failed to remove orphaned object");
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        asset_id = asset.id,
        media_id,
        user_id = user.user_id,
        bytes = asset.byte_size,
        kind = %asset.kind,
        "Asset uploaded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete_asset(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = state
        .store
        .get_asset(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    state.objects.delete(&asset.storage_path).await?;
    if !state.store.delete_asset(id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Asset", id }));
    }

    tracing::info!(asset_id = id, media_id = asset.media_id, user_id = user.user_id, "Asset deleted");

    Ok(StatusCode::NO_CONTENT)
}
