//! Route definitions for media items and workflow transitions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// GET    /                   -> list_media
/// POST   /                   -> create_media
/// GET    /{id}               -> get_media
/// PUT    /{id}               -> update_media
/// POST   /{id}/submit        -> submit_media
/// POST   /{id}/approve       -> approve_media
/// POST   /{id}/reject        -> reject_media
/// POST   /{id}/publish       -> publish_media
/// POST   /{id}/unpublish     -> unpublish_media
/// POST   /{id}/schedule      -> schedule_media
/// POST   /{id}/archive       -> archive_media
/// GET    /{id}/submissions   -> list_submissions
/// GET    /{id}/audit         -> list_media_audit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(media::list_media).post(media::create_media))
        .route("/{id}", get(media::get_media).put(media::update_media))
        .route("/{id}/submit", post(media::submit_media))
        .route("/{id}/approve", post(media::approve_media))
        .route("/{id}/reject", post(media::reject_media))
        .route("/{id}/publish", post(media::publish_media))
        .route("/{id}/unpublish", post(media::unpublish_media))
        .route("/{id}/schedule", post(media::schedule_media))
        .route("/{id}/archive", post(media::archive_media))
        .route("/{id}/submissions", get(media::list_submissions))
        .route("/{id}/audit", get(media::list_media_audit))
}
