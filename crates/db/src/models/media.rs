//! `media_items` rows.

use mediahub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `media_items` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MediaItemRow {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub canonical_url: Option<String>,
    pub language: String,
    pub content_type: String,
    pub status: String,
    pub visibility: String,
    pub published_at: Option<Timestamp>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert shape (excludes `id`; status is always `draft`).
#[derive(Debug, Clone)]
pub struct CreateMediaItemRow {
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub canonical_url: Option<String>,
    pub language: String,
    pub content_type: String,
    pub visibility: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
}
