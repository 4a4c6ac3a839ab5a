//! The single translation point between database rows and domain types.
//!
//! Repositories speak rows; [`crate::store::PgStore`] speaks domain types.
//! Every field mapping in either direction lives here.

use mediahub_core::asset::{Asset, AssetKind, NewAsset};
use mediahub_core::audit::{AuditAction, AuditDiff, AuditLogEntry, NewAuditEntry};
use mediahub_core::media::{
    ContentType, MediaItem, MediaStatus, SeoMeta, Submission, SubmissionState, Visibility,
};
use mediahub_core::store::MediaDraft;
use mediahub_core::taxonomy::{TaxonomyKind, TaxonomyTerm};

use crate::models::asset::{AssetRow, CreateAssetRow};
use crate::models::audit::{AuditLogRow, CreateAuditLogRow};
use crate::models::media::{CreateMediaItemRow, MediaItemRow};
use crate::models::submission::SubmissionRow;
use crate::models::taxonomy::TaxonomyTermRow;

/// A stored value that does not map onto the domain model.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("{table}.{column} holds unknown value '{value}'")]
    UnknownValue {
        table: &'static str,
        column: &'static str,
        value: String,
    },

    #[error("audit_logs.diff for entry {id} is malformed: {source}")]
    Diff {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
}

fn parse<T>(
    table: &'static str,
    column: &'static str,
    value: &str,
    from_name: fn(&str) -> Option<T>,
) -> Result<T, RowError> {
    from_name(value).ok_or_else(|| RowError::UnknownValue {
        table,
        column,
        value: value.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Media items
// ---------------------------------------------------------------------------

impl TryFrom<MediaItemRow> for MediaItem {
    type Error = RowError;

    fn try_from(row: MediaItemRow) -> Result<Self, Self::Error> {
        const TABLE: &str = "media_items";
        Ok(MediaItem {
            content_type: parse(TABLE, "content_type", &row.content_type, ContentType::from_name)?,
            status: parse(TABLE, "status", &row.status, MediaStatus::from_name)?,
            visibility: parse(TABLE, "visibility", &row.visibility, Visibility::from_name)?,
            id: row.id,
            slug: row.slug,
            title: row.title,
            summary: row.summary,
            body: row.body,
            seo: SeoMeta {
                title: row.seo_title,
                description: row.seo_description,
                canonical_url: row.canonical_url,
            },
            language: row.language,
            published_at: row.published_at,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<&MediaItem> for MediaItemRow {
    fn from(item: &MediaItem) -> Self {
        MediaItemRow {
            id: item.id,
            slug: item.slug.clone(),
            title: item.title.clone(),
            summary: item.summary.clone(),
            body: item.body.clone(),
            seo_title: item.seo.title.clone(),
            seo_description: item.seo.description.clone(),
            canonical_url: item.seo.canonical_url.clone(),
            language: item.language.clone(),
            content_type: item.content_type.name().to_string(),
            status: item.status.name().to_string(),
            visibility: item.visibility.name().to_string(),
            published_at: item.published_at,
            created_by: item.created_by,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl From<MediaDraft> for CreateMediaItemRow {
    fn from(draft: MediaDraft) -> Self {
        CreateMediaItemRow {
            slug: draft.slug,
            title: draft.title,
            summary: draft.summary,
            body: draft.body,
            seo_title: draft.seo.title,
            seo_description: draft.seo.description,
            canonical_url: draft.seo.canonical_url,
            language: draft.language,
            content_type: draft.content_type.name().to_string(),
            visibility: draft.visibility.name().to_string(),
            created_by: draft.created_by,
            created_at: draft.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

impl TryFrom<SubmissionRow> for Submission {
    type Error = RowError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        Ok(Submission {
            state: parse("submissions", "state", &row.state, SubmissionState::from_name)?,
            id: row.id,
            media_id: row.media_id,
            submitted_by: row.submitted_by,
            reviewer_id: row.reviewer_id,
            created_at: row.created_at,
            decided_at: row.decided_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

impl TryFrom<AuditLogRow> for AuditLogEntry {
    type Error = RowError;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        let diff: AuditDiff =
            serde_json::from_value(row.diff).map_err(|source| RowError::Diff { id: row.id, source })?;
        Ok(AuditLogEntry {
            action: parse("audit_logs", "action", &row.action, AuditAction::from_name)?,
            id: row.id,
            actor_id: row.actor_id,
            timestamp: row.timestamp,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            diff,
        })
    }
}

impl TryFrom<NewAuditEntry> for CreateAuditLogRow {
    type Error = serde_json::Error;

    fn try_from(entry: NewAuditEntry) -> Result<Self, Self::Error> {
        Ok(CreateAuditLogRow {
            action: entry.action().name().to_string(),
            actor_id: entry.actor_id,
            timestamp: entry.timestamp,
            entity_type: entry.entity_type.to_string(),
            entity_id: entry.entity_id,
            diff: serde_json::to_value(&entry.diff)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

impl TryFrom<AssetRow> for Asset {
    type Error = RowError;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        Ok(Asset {
            kind: parse("assets", "kind", &row.kind, AssetKind::from_name)?,
            id: row.id,
            media_id: row.media_id,
            storage_path: row.storage_path,
            public_url: row.public_url,
            mime_type: row.mime_type,
            byte_size: row.byte_size,
            width: row.width,
            height: row.height,
            duration_secs: row.duration_secs,
            checksum: row.checksum,
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
        })
    }
}

impl From<NewAsset> for CreateAssetRow {
    fn from(asset: NewAsset) -> Self {
        CreateAssetRow {
            media_id: asset.media_id,
            storage_path: asset.storage_path,
            public_url: asset.public_url,
            mime_type: asset.mime_type,
            byte_size: asset.byte_size,
            width: asset.width,
            height: asset.height,
            duration_secs: asset.duration_secs,
            checksum: asset.checksum,
            kind: asset.kind.name().to_string(),
            uploaded_by: asset.uploaded_by,
        }
    }
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

impl TryFrom<TaxonomyTermRow> for TaxonomyTerm {
    type Error = RowError;

    fn try_from(row: TaxonomyTermRow) -> Result<Self, Self::Error> {
        Ok(TaxonomyTerm {
            kind: parse("taxonomy_terms", "kind", &row.kind, TaxonomyKind::from_name)?,
            id: row.id,
            label: row.label,
            key: row.key,
            created_at: row.created_at,
        })
    }
}
