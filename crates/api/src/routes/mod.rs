pub mod assets;
pub mod audit;
pub mod health;
pub mod media;
pub mod public;
pub mod taxonomy;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /media                                   list, create
/// /media/{id}                              get, edit (PUT)
/// /media/{id}/submit                       submit for review (POST)
/// /media/{id}/approve                      approve (POST)
/// /media/{id}/reject                       reject (POST)
/// /media/{id}/publish                      publish now (POST)
/// /media/{id}/unpublish                    unpublish (POST)
/// /media/{id}/schedule                     schedule (POST)
/// /media/{id}/archive                      archive (POST)
/// /media/{id}/submissions                  review history (GET)
/// /media/{id}/audit                        audit entries (GET)
/// /media/{id}/assets                       list, upload (multipart)
/// /media/{id}/taxonomy                     attached terms (GET)
/// /media/{id}/taxonomy/{term_id}           attach (PUT), detach (DELETE)
///
/// /assets/{id}                             delete asset and stored object
///
/// /taxonomy                                list (?kind=), create
///
/// /audit                                   global audit query (admin only)
///
/// /public/media                            visibility-gated list (no auth)
/// /public/media/{slug}                     visibility-gated detail (no auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Media items, workflow transitions, and item-scoped sub-resources.
        .nest(
            "/media",
            media::router()
                .merge(assets::media_router())
                .merge(taxonomy::media_router()),
        )
        .nest("/assets", assets::router())
        .nest("/taxonomy", taxonomy::router())
        .nest("/audit", audit::router())
        // Public site (no authentication).
        .nest("/public", public::router())
}
