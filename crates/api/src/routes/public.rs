use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Unauthenticated routes mounted at `/public`.
///
/// ```text
/// GET    /media          -> list_public_media
/// GET    /media/{slug}   -> get_public_media
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/media", get(public::list_public_media))
        .route("/media/{slug}", get(public::get_public_media))
}
