//! `submissions` rows.

use mediahub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SubmissionRow {
    pub id: DbId,
    pub media_id: DbId,
    pub state: String,
    pub submitted_by: DbId,
    pub reviewer_id: Option<DbId>,
    pub created_at: Timestamp,
    pub decided_at: Option<Timestamp>,
}
