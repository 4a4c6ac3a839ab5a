//! Handlers for taxonomy terms and their attachment to media items.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediahub_core::error::CoreError;
use mediahub_core::roles::Role;
use mediahub_core::taxonomy::{CreateTerm, TaxonomyKind, TaxonomyTerm};
use mediahub_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::media::load_media;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_any, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TermListParams {
    pub kind: Option<TaxonomyKind>,
}

async fn load_term(state: &AppState, id: DbId) -> AppResult<TaxonomyTerm> {
    state
        .store
        .get_term(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TaxonomyTerm",
            id,
        }))
}

/// GET /api/v1/taxonomy?kind=
pub async fn list_terms(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TermListParams>,
) -> AppResult<impl IntoResponse> {
    let terms = state.store.list_terms(params.kind).await?;
    Ok(Json(DataResponse { data: terms }))
}

/// POST /api/v1/taxonomy
///
/// Admin or Editor only. A duplicate `(kind, key)` is a 409.
pub async fn create_term(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTerm>,
) -> AppResult<impl IntoResponse> {
    require_any(&auth, &[Role::Admin, Role::Editor], "creating taxonomy terms")?;
    let term = state.store.create_term(input.validate()?).await?;

    tracing::info!(term_id = term.id, kind = %term.kind, key = %term.key, user_id = auth.user_id, "Taxonomy term created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: term })))
}

/// GET /api/v1/media/{id}/taxonomy
pub async fn media_terms(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(media_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_media(&state, media_id).await?;
    let terms = state.store.terms_for_media(media_id).await?;
    Ok(Json(DataResponse { data: terms }))
}

/// PUT /api/v1/media/{id}/taxonomy/{term_id}
///
/// Idempotent: 201 when the association is new, 200 when it already existed.
pub async fn attach_term(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path((media_id, term_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    load_media(&state, media_id).await?;
    let term = load_term(&state, term_id).await?;

    let created = state.store.attach_term(media_id, term_id).await?;
    let status = if created {
        tracing::info!(media_id, term_id, user_id = user.user_id, "Taxonomy term attached");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(DataResponse { data: term })))
}

/// DELETE /api/v1/media/{id}/taxonomy/{term_id}
pub async fn detach_term(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path((media_id, term_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !state.store.detach_term(media_id, term_id).await? {
        return Err(AppError::NotFound(format!(
            "TaxonomyTerm {term_id} is not attached to MediaItem {media_id}"
        )));
    }

    tracing::info!(media_id, term_id, user_id = user.user_id, "Taxonomy term detached");

    Ok(StatusCode::NO_CONTENT)
}
