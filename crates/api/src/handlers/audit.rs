use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use mediahub_core::audit::AuditQuery;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::PageResponse;
use crate::state::AppState;

/// GET /api/v1/audit?actor_id=&action=&entity_type=&entity_id=&from=&to=&limit=&offset=
///
/// Admin only. Newest entries first.
pub async fn query_audit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<AuditQuery>,
) -> AppResult<impl IntoResponse> {
    let page = state.store.list_audit(&params).await?;
    Ok(Json(PageResponse::from(page)))
}
