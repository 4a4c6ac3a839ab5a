//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose roles do not
//! meet the requirement. Workflow transitions do not use these; the engine
//! checks their roles.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mediahub_core::error::CoreError;
use mediahub_core::roles::{Role, EDIT_ROLES};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Reject with 403 unless `user` holds one of `roles`.
pub fn require_any(user: &AuthUser, roles: &[Role], action: &str) -> Result<(), AppError> {
    if user.roles.intersects(roles) {
        return Ok(());
    }
    let names: Vec<&str> = roles.iter().map(|r| r.name()).collect();
    Err(AppError::Core(CoreError::PermissionDenied(format!(
        "{action} requires one of: {}",
        names.join(", ")
    ))))
}

/// Requires the `admin` role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_any(&user, &[Role::Admin], "this resource")?;
        Ok(RequireAdmin(user))
    }
}

/// Requires an edit-capable role (`admin`, `editor` or `provider`).
pub struct RequireEditor(pub AuthUser);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_any(&user, EDIT_ROLES, "editing content")?;
        Ok(RequireEditor(user))
    }
}
