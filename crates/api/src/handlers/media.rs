//! Handlers for media items and their workflow transitions.
//!
//! Every transition delegates to the workflow engine with the caller taken
//! from the request's token. Role and status guards are the engine's; the
//! handlers only translate HTTP shapes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{FixedOffset, Local, NaiveDate, NaiveTime};
use mediahub_core::audit::AuditQuery;
use mediahub_core::error::CoreError;
use mediahub_core::media::{MediaItem, MediaUpdate, NewMediaItem};
use mediahub_core::types::{DbId, Timestamp};
use mediahub_core::workflow::resolve_publish_at;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{MediaListParams, PaginationParams};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Load an item or fail with 404.
pub(crate) async fn load_media(state: &AppState, id: DbId) -> AppResult<MediaItem> {
    state
        .store
        .get_media(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MediaItem",
            id,
        }))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/media
///
/// Create a Draft item. The slug is derived from the title when omitted.
pub async fn create_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<NewMediaItem>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.create(&auth.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome.item })))
}

/// GET /api/v1/media
pub async fn list_media(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MediaListParams>,
) -> AppResult<impl IntoResponse> {
    let page = state.store.query_media(&params.into_query()).await?;
    Ok(Json(PageResponse::from(page)))
}

/// GET /api/v1/media/{id}
pub async fn get_media(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = load_media(&state, id).await?;
    Ok(Json(DataResponse { data: item }))
}

/// PUT /api/v1/media/{id}
///
/// Partial content update. Absent fields are untouched; `null` clears an
/// optional text field.
pub async fn update_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(update): Json<MediaUpdate>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.edit(&auth.caller(), id, update).await?;
    Ok(Json(DataResponse { data: outcome.item }))
}

/// GET /api/v1/media/{id}/submissions
///
/// Review history, newest first.
pub async fn list_submissions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_media(&state, id).await?;
    let submissions = state.store.list_submissions(id).await?;
    Ok(Json(DataResponse { data: submissions }))
}

/// GET /api/v1/media/{id}/audit
pub async fn list_media_audit(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    load_media(&state, id).await?;
    let query = AuditQuery {
        limit: params.limit,
        offset: params.offset,
        ..AuditQuery::for_media(id)
    };
    let page = state.store.list_audit(&query).await?;
    Ok(Json(PageResponse::from(page)))
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/media/{id}/submit
pub async fn submit_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.submit_for_review(&auth.caller(), id).await?;
    Ok(Json(DataResponse { data: outcome.item }))
}

/// POST /api/v1/media/{id}/approve
pub async fn approve_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.approve(&auth.caller(), id).await?;
    Ok(Json(DataResponse { data: outcome.item }))
}

/// POST /api/v1/media/{id}/reject
pub async fn reject_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.reject(&auth.caller(), id).await?;
    Ok(Json(DataResponse { data: outcome.item }))
}

/// POST /api/v1/media/{id}/publish
pub async fn publish_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.publish_now(&auth.caller(), id).await?;
    Ok(Json(DataResponse { data: outcome.item }))
}

/// POST /api/v1/media/{id}/unpublish
pub async fn unpublish_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.unpublish(&auth.caller(), id).await?;
    Ok(Json(DataResponse { data: outcome.item }))
}

/// POST /api/v1/media/{id}/archive
pub async fn archive_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.archive(&auth.caller(), id).await?;
    Ok(Json(DataResponse { data: outcome.item }))
}

/// Body for `POST /media/{id}/schedule`.
///
/// Either an absolute `publish_at`, or a calendar `date` with optional
/// `time` (midnight when omitted). `date`/`time` are read in the fixed
/// offset `utc_offset_minutes` when given, otherwise in the server's local
/// time zone.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleRequest {
    pub publish_at: Option<Timestamp>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub utc_offset_minutes: Option<i32>,
}

impl ScheduleRequest {
    pub fn resolve(&self) -> AppResult<Timestamp> {
        match (self.publish_at, self.date) {
            (Some(_), None) if self.time.is_some() || self.utc_offset_minutes.is_some() => {
                Err(AppError::BadRequest(
                    "time and utc_offset_minutes apply only to date, not publish_at".into(),
                ))
            }
            (Some(at), None) => Ok(at),
            (None, Some(date)) => {
                let at = match self.utc_offset_minutes {
                    Some(minutes) => {
                        let offset = minutes
                            .checked_mul(60)
                            .and_then(FixedOffset::east_opt)
                            .ok_or_else(|| {
                                AppError::BadRequest(format!(
                                    "utc_offset_minutes {minutes} is out of range"
                                ))
                            })?;
                        resolve_publish_at(date, self.time, &offset)?
                    }
                    None => resolve_publish_at(date, self.time, &Local)?,
                };
                Ok(at)
            }
            (Some(_), Some(_)) => Err(AppError::BadRequest(
                "Provide either publish_at or date, not both".into(),
            )),
            (None, None) => Err(AppError::BadRequest(
                "Either publish_at or date is required".into(),
            )),
        }
    }
}

/// POST /api/v1/media/{id}/schedule
pub async fn schedule_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ScheduleRequest>,
) -> AppResult<impl IntoResponse> {
    let publish_at = input.resolve()?;
    let outcome = state.engine.schedule(&auth.caller(), id, publish_at).await?;
    Ok(Json(DataResponse { data: outcome.item }))
}
