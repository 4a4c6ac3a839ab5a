//! `audit_logs` rows. Immutable once inserted (no `updated_at`).

use mediahub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AuditLogRow {
    pub id: DbId,
    pub action: String,
    pub actor_id: DbId,
    pub timestamp: Timestamp,
    pub entity_type: String,
    pub entity_id: DbId,
    /// Tagged `AuditDiff` JSON.
    pub diff: serde_json::Value,
}

/// Insert shape (excludes `id`).
#[derive(Debug, Clone)]
pub struct CreateAuditLogRow {
    pub action: String,
    pub actor_id: DbId,
    pub timestamp: Timestamp,
    pub entity_type: String,
    pub entity_id: DbId,
    pub diff: serde_json::Value,
}
