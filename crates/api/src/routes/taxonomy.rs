use axum::routing::{get, put};
use axum::Router;

use crate::handlers::taxonomy;
use crate::state::AppState;

/// Term routes mounted at `/taxonomy`.
///
/// ```text
/// GET    /   -> list_terms (?kind=)
/// POST   /   -> create_term
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(taxonomy::list_terms).post(taxonomy::create_term))
}

/// Item-scoped term routes merged into `/media`.
///
/// ```text
/// GET    /{id}/taxonomy             -> media_terms
/// PUT    /{id}/taxonomy/{term_id}   -> attach_term
/// DELETE /{id}/taxonomy/{term_id}   -> detach_term
/// ```
pub fn media_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/taxonomy", get(taxonomy::media_terms))
        .route(
            "/{id}/taxonomy/{term_id}",
            put(taxonomy::attach_term).delete(taxonomy::detach_term),
        )
}
