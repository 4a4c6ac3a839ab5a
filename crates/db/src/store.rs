//! [`PgStore`]: the PostgreSQL implementation of the core store contracts.

use async_trait::async_trait;
use mediahub_core::asset::{Asset, NewAsset};
use mediahub_core::audit::{AuditDiff, AuditLogEntry, AuditQuery, NewAuditEntry};
use mediahub_core::media::{MediaItem, Submission};
use mediahub_core::store::{
    AssetStore, AuditStore, MediaDraft, MediaQuery, MediaStore, Page, StoreError, StoreHealth,
    SubmissionWrite, TaxonomyStore, TransitionCommit, TransitionOutcome,
};
use mediahub_core::taxonomy::{NewTerm, TaxonomyKind, TaxonomyTerm};
use mediahub_core::types::DbId;

use crate::adapter::RowError;
use crate::models::asset::CreateAssetRow;
use crate::models::audit::CreateAuditLogRow;
use crate::models::media::{CreateMediaItemRow, MediaItemRow};
use crate::repositories::{AssetRepo, AuditLogRepo, MediaRepo, SubmissionRepo, TaxonomyRepo};
use crate::DbPool;

/// Store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Human-readable detail for known unique constraints.
fn conflict_detail(constraint: &str) -> String {
    match constraint {
        "uq_media_items_slug" => "Slug is already in use".to_string(),
        "uq_taxonomy_terms_kind_key" => "A term with this key already exists for the kind".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

/// Map a sqlx error for `operation`. Unique violations (23505) become
/// [`StoreError::Conflict`].
fn db_error(operation: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |err| {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let detail = conflict_detail(db_err.constraint().unwrap_or("unknown"));
                return StoreError::Conflict { operation, detail };
            }
        }
        StoreError::backend(operation, err)
    }
}

fn corrupt(operation: &'static str) -> impl Fn(RowError) -> StoreError {
    move |err| StoreError::Corrupt {
        operation,
        detail: err.to_string(),
    }
}

fn convert_all<R, T>(operation: &'static str, rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = RowError>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(corrupt(operation)))
        .collect()
}

fn audit_row(
    operation: &'static str,
    entry: NewAuditEntry,
) -> Result<CreateAuditLogRow, StoreError> {
    CreateAuditLogRow::try_from(entry).map_err(|e| StoreError::Corrupt {
        operation,
        detail: e.to_string(),
    })
}

#[async_trait]
impl MediaStore for PgStore {
    async fn get_media(&self, id: DbId) -> Result<Option<MediaItem>, StoreError> {
        const OP: &str = "media.get";
        MediaRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error(OP))?
            .map(|row| MediaItem::try_from(row).map_err(corrupt(OP)))
            .transpose()
    }

    async fn get_media_by_slug(&self, slug: &str) -> Result<Option<MediaItem>, StoreError> {
        const OP: &str = "media.get_by_slug";
        MediaRepo::find_by_slug(&self.pool, slug)
            .await
            .map_err(db_error(OP))?
            .map(|row| MediaItem::try_from(row).map_err(corrupt(OP)))
            .transpose()
    }

    async fn create_media(
        &self,
        draft: MediaDraft,
    ) -> Result<(MediaItem, AuditLogEntry), StoreError> {
        const OP: &str = "media.create";
        let mut tx = self.pool.begin().await.map_err(db_error(OP))?;

        let row = MediaRepo::insert(&mut tx, &CreateMediaItemRow::from(draft))
            .await
            .map_err(db_error(OP))?;
        let item = MediaItem::try_from(row).map_err(corrupt(OP))?;

        let created = NewAuditEntry::for_media(
            item.created_by,
            item.id,
            AuditDiff::Created {
                status: item.status,
                visibility: item.visibility,
            },
            item.created_at,
        );
        let audit = AuditLogRepo::insert(&mut tx, &audit_row(OP, created)?)
            .await
            .map_err(db_error(OP))?;
        let audit = AuditLogEntry::try_from(audit).map_err(corrupt(OP))?;

        tx.commit().await.map_err(db_error(OP))?;
        Ok((item, audit))
    }

    async fn query_media(&self, query: &MediaQuery) -> Result<Page<MediaItem>, StoreError> {
        const OP: &str = "media.query";
        let rows = MediaRepo::query(&self.pool, query)
            .await
            .map_err(db_error(OP))?;
        let total = MediaRepo::count(&self.pool, &query.filter)
            .await
            .map_err(db_error(OP))?;
        Ok(Page {
            items: convert_all(OP, rows)?,
            total,
        })
    }

    async fn latest_submission(&self, media_id: DbId) -> Result<Option<Submission>, StoreError> {
        const OP: &str = "submission.latest";
        SubmissionRepo::find_latest(&self.pool, media_id)
            .await
            .map_err(db_error(OP))?
            .map(|row| Submission::try_from(row).map_err(corrupt(OP)))
            .transpose()
    }

    async fn list_submissions(&self, media_id: DbId) -> Result<Vec<Submission>, StoreError> {
        const OP: &str = "submission.list";
        let rows = SubmissionRepo::list_by_media(&self.pool, media_id)
            .await
            .map_err(db_error(OP))?;
        convert_all(OP, rows)
    }

    async fn commit(
        &self,
        commit: TransitionCommit,
    ) -> Result<Option<TransitionOutcome>, StoreError> {
        const OP: &str = "media.commit";
        let media_id = commit.next.id;
        let at = commit.audit.timestamp;
        let mut tx = self.pool.begin().await.map_err(db_error(OP))?;

        let updated = MediaRepo::update_if_status(
            &mut tx,
            &MediaItemRow::from(&commit.next),
            commit.expected_status.name(),
        )
        .await
        .map_err(db_error(OP))?;
        let Some(row) = updated else {
            tx.rollback().await.map_err(db_error(OP))?;
            return Ok(None);
        };

        let submission_row = match commit.submission {
            None => None,
            Some(SubmissionWrite::Open { submitted_by }) => Some(
                SubmissionRepo::insert(&mut tx, media_id, submitted_by, at)
                    .await
                    .map_err(db_error(OP))?,
            ),
            Some(SubmissionWrite::Resolve {
                submission_id,
                state,
                reviewer_id,
            }) => {
                let resolved = SubmissionRepo::resolve_if_open(
                    &mut tx,
                    submission_id,
                    media_id,
                    state.name(),
                    reviewer_id,
                    at,
                )
                .await
                .map_err(db_error(OP))?;
                match resolved {
                    Some(row) => Some(row),
                    None => {
                        tx.rollback().await.map_err(db_error(OP))?;
                        return Ok(None);
                    }
                }
            }
        };

        let audit = AuditLogRepo::insert(&mut tx, &audit_row(OP, commit.audit)?)
            .await
            .map_err(db_error(OP))?;

        let item = MediaItem::try_from(row).map_err(corrupt(OP))?;
        let submission = submission_row
            .map(|row| Submission::try_from(row).map_err(corrupt(OP)))
            .transpose()?;
        let audit = AuditLogEntry::try_from(audit).map_err(corrupt(OP))?;

        tx.commit().await.map_err(db_error(OP))?;
        Ok(Some(TransitionOutcome {
            item,
            submission,
            audit,
        }))
    }
}

#[async_trait]
impl AuditStore for PgStore {
    async fn list_audit(&self, query: &AuditQuery) -> Result<Page<AuditLogEntry>, StoreError> {
        const OP: &str = "audit.list";
        let rows = AuditLogRepo::query(&self.pool, query)
            .await
            .map_err(db_error(OP))?;
        let total = AuditLogRepo::count(&self.pool, query)
            .await
            .map_err(db_error(OP))?;
        Ok(Page {
            items: convert_all(OP, rows)?,
            total,
        })
    }
}

#[async_trait]
impl AssetStore for PgStore {
    async fn insert_asset(&self, asset: NewAsset) -> Result<Asset, StoreError> {
        const OP: &str = "asset.insert";
        let row = AssetRepo::create(&self.pool, &CreateAssetRow::from(asset))
            .await
            .map_err(db_error(OP))?;
        Asset::try_from(row).map_err(corrupt(OP))
    }

    async fn get_asset(&self, id: DbId) -> Result<Option<Asset>, StoreError> {
        const OP: &str = "asset.get";
        AssetRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error(OP))?
            .map(|row| Asset::try_from(row).map_err(corrupt(OP)))
            .transpose()
    }

    async fn list_assets(&self, media_id: DbId) -> Result<Vec<Asset>, StoreError> {
        const OP: &str = "asset.list";
        let rows = AssetRepo::list_by_media(&self.pool, media_id)
            .await
            .map_err(db_error(OP))?;
        convert_all(OP, rows)
    }

    async fn delete_asset(&self, id: DbId) -> Result<bool, StoreError> {
        AssetRepo::delete(&self.pool, id)
            .await
            .map_err(db_error("asset.delete"))
    }
}

#[async_trait]
impl TaxonomyStore for PgStore {
    async fn create_term(&self, term: NewTerm) -> Result<TaxonomyTerm, StoreError> {
        const OP: &str = "taxonomy.create";
        let row = TaxonomyRepo::create(&self.pool, &term)
            .await
            .map_err(db_error(OP))?;
        TaxonomyTerm::try_from(row).map_err(corrupt(OP))
    }

    async fn get_term(&self, id: DbId) -> Result<Option<TaxonomyTerm>, StoreError> {
        const OP: &str = "taxonomy.get";
        TaxonomyRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error(OP))?
            .map(|row| TaxonomyTerm::try_from(row).map_err(corrupt(OP)))
            .transpose()
    }

    async fn list_terms(
        &self,
        kind: Option<TaxonomyKind>,
    ) -> Result<Vec<TaxonomyTerm>, StoreError> {
        const OP: &str = "taxonomy.list";
        let rows = TaxonomyRepo::list(&self.pool, kind.map(|k| k.name()))
            .await
            .map_err(db_error(OP))?;
        convert_all(OP, rows)
    }

    async fn attach_term(&self, media_id: DbId, term_id: DbId) -> Result<bool, StoreError> {
        TaxonomyRepo::attach(&self.pool, media_id, term_id)
            .await
            .map_err(db_error("taxonomy.attach"))
    }

    async fn detach_term(&self, media_id: DbId, term_id: DbId) -> Result<bool, StoreError> {
        TaxonomyRepo::detach(&self.pool, media_id, term_id)
            .await
            .map_err(db_error("taxonomy.detach"))
    }

    async fn terms_for_media(&self, media_id: DbId) -> Result<Vec<TaxonomyTerm>, StoreError> {
        const OP: &str = "taxonomy.for_media";
        let rows = TaxonomyRepo::list_for_media(&self.pool, media_id)
            .await
            .map_err(db_error(OP))?;
        convert_all(OP, rows)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(db_error("store.ping"))
    }
}
