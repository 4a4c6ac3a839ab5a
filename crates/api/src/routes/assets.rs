use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset routes mounted at `/assets`.
///
/// ```text
/// DELETE /{id}   -> delete_asset
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(assets::delete_asset))
}

/// Item-scoped asset routes merged into `/media`.
///
/// ```text
/// GET    /{id}/assets   -> list_assets
/// POST   /{id}/assets   -> upload_asset (multipart)
/// ```
pub fn media_router() -> Router<AppState> {
    Router::new().route(
        "/{id}/assets",
        get(assets::list_assets).post(assets::upload_asset),
    )
}
