//! `taxonomy_terms` rows.

use mediahub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TaxonomyTermRow {
    pub id: DbId,
    pub kind: String,
    pub label: String,
    pub key: String,
    pub created_at: Timestamp,
}
