//! Repository for the `assets` table.

use mediahub_core::types::DbId;
use sqlx::PgPool;

use crate::models::asset::{AssetRow, CreateAssetRow};

/// Column list for `assets` SELECT queries.
const COLUMNS: &str = "\
    id, media_id, storage_path, public_url, mime_type, byte_size, \
    width, height, duration_secs, checksum, kind, uploaded_by, created_at";

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    pub async fn create(pool: &PgPool, input: &CreateAssetRow) -> Result<AssetRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets \
                (media_id, storage_path, public_url, mime_type, byte_size, \
                 width, height, duration_secs, checksum, kind, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(input.media_id)
            .bind(&input.storage_path)
            .bind(&input.public_url)
            .bind(&input.mime_type)
            .bind(input.byte_size)
            .bind(input.width)
            .bind(input.height)
            .bind(input.duration_secs)
            .bind(&input.checksum)
            .bind(&input.kind)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_media(pool: &PgPool, media_id: DbId) -> Result<Vec<AssetRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE media_id = $1 ORDER BY id");
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(media_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an asset record. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
