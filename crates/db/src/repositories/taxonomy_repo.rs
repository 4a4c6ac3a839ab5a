//! Repository for the `taxonomy_terms` and `media_taxonomy` tables.

use mediahub_core::taxonomy::NewTerm;
use mediahub_core::types::DbId;
use sqlx::PgPool;

use crate::models::taxonomy::TaxonomyTermRow;

/// Column list for `taxonomy_terms` SELECT queries.
const COLUMNS: &str = "id, kind, label, key, created_at";

/// Provides term CRUD and media association operations.
pub struct TaxonomyRepo;

impl TaxonomyRepo {
    pub async fn create(pool: &PgPool, input: &NewTerm) -> Result<TaxonomyTermRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO taxonomy_terms (kind, label, key) VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaxonomyTermRow>(&query)
            .bind(input.kind.name())
            .bind(&input.label)
            .bind(&input.key)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TaxonomyTermRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM taxonomy_terms WHERE id = $1");
        sqlx::query_as::<_, TaxonomyTermRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List terms, optionally restricted to one kind.
    pub async fn list(
        pool: &PgPool,
        kind: Option<&str>,
    ) -> Result<Vec<TaxonomyTermRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM taxonomy_terms \
             WHERE ($1::TEXT IS NULL OR kind = $1) \
             ORDER BY kind, label"
        );
        sqlx::query_as::<_, TaxonomyTermRow>(&query)
            .bind(kind)
            .fetch_all(pool)
            .await
    }

    /// Returns `true` when a new association was created.
    pub async fn attach(pool: &PgPool, media_id: DbId, term_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO media_taxonomy (media_id, term_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(media_id)
        .bind(term_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `true` when an association was removed.
    pub async fn detach(pool: &PgPool, media_id: DbId, term_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media_taxonomy WHERE media_id = $1 AND term_id = $2")
            .bind(media_id)
            .bind(term_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_media(
        pool: &PgPool,
        media_id: DbId,
    ) -> Result<Vec<TaxonomyTermRow>, sqlx::Error> {
        sqlx::query_as::<_, TaxonomyTermRow>(
            "SELECT t.id, t.kind, t.label, t.key, t.created_at \
             FROM taxonomy_terms t \
             JOIN media_taxonomy mt ON mt.term_id = t.id \
             WHERE mt.media_id = $1 \
             ORDER BY t.label",
        )
        .bind(media_id)
        .fetch_all(pool)
        .await
    }
}
