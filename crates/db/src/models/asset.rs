//! `assets` rows.

use mediahub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AssetRow {
    pub id: DbId,
    pub media_id: DbId,
    pub storage_path: String,
    pub public_url: String,
    pub mime_type: String,
    pub byte_size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_secs: Option<f64>,
    pub checksum: String,
    pub kind: String,
    pub uploaded_by: DbId,
    pub created_at: Timestamp,
}

/// Insert shape (excludes `id` and `created_at`).
#[derive(Debug, Clone)]
pub struct CreateAssetRow {
    pub media_id: DbId,
    pub storage_path: String,
    pub public_url: String,
    pub mime_type: String,
    pub byte_size: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_secs: Option<f64>,
    pub checksum: String,
    pub kind: String,
    pub uploaded_by: DbId,
}
