//! Repository for the `submissions` table.

use mediahub_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::submission::SubmissionRow;

/// Column list for `submissions` SELECT queries.
const COLUMNS: &str = "id, media_id, state, submitted_by, reviewer_id, created_at, decided_at";

/// Provides insert, resolve and lookup operations for submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Most recent submission for a media item (creation time, then id).
    pub async fn find_latest(
        pool: &PgPool,
        media_id: DbId,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions WHERE media_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(media_id)
            .fetch_optional(pool)
            .await
    }

    /// All submissions for a media item, newest first.
    pub async fn list_by_media(
        pool: &PgPool,
        media_id: DbId,
    ) -> Result<Vec<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions WHERE media_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(media_id)
            .fetch_all(pool)
            .await
    }

    /// Open a new review cycle in `submitted`.
    pub async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        media_id: DbId,
        submitted_by: DbId,
        created_at: Timestamp,
    ) -> Result<SubmissionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions (media_id, state, submitted_by, created_at) \
             VALUES ($1, 'submitted', $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(media_id)
            .bind(submitted_by)
            .bind(created_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Record the review decision, only if the submission is still open.
    pub async fn resolve_if_open(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        media_id: DbId,
        state: &str,
        reviewer_id: DbId,
        decided_at: Timestamp,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions SET state = $3, reviewer_id = $4, decided_at = $5 \
             WHERE id = $1 AND media_id = $2 AND state = 'submitted' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .bind(media_id)
            .bind(state)
            .bind(reviewer_id)
            .bind(decided_at)
            .fetch_optional(&mut **tx)
            .await
    }
}
