//! Contracts with the persistence and object-storage collaborators.
//!
//! The `db` crate implements these traits over PostgreSQL; [`memory`]
//! implements them in-process for tests and local development.

pub mod memory;

use async_trait::async_trait;

use crate::asset::{Asset, NewAsset};
use crate::audit::{AuditLogEntry, AuditQuery, NewAuditEntry};
use crate::media::{
    ContentType, MediaItem, MediaStatus, SeoMeta, Submission, SubmissionState, Visibility,
};
use crate::taxonomy::{NewTerm, TaxonomyKind, TaxonomyTerm};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of an underlying store, identity, or object-storage call.
///
/// Always carries the name of the operation that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{operation}: {detail}")]
    Conflict {
        operation: &'static str,
        detail: String,
    },

    #[error("{operation}: stored record is invalid: {detail}")]
    Corrupt {
        operation: &'static str,
        detail: String,
    },

    #[error("{operation} failed: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, source: impl Into<BoxError>) -> Self {
        StoreError::Backend {
            operation,
            source: source.into(),
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            StoreError::Conflict { operation, .. }
            | StoreError::Corrupt { operation, .. }
            | StoreError::Backend { operation, .. } => operation,
        }
    }
}

// ---------------------------------------------------------------------------
// Query shapes
// ---------------------------------------------------------------------------

/// Default page size for list queries.
pub const DEFAULT_LIMIT: i64 = 25;
/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub offset: i64,
    pub limit: i64,
}

impl PageRange {
    /// Clamp caller-supplied values into a valid range.
    pub fn clamp(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for PageRange {
    fn default() -> Self {
        Self::clamp(None, None)
    }
}

/// A page of rows plus the total count matching the filter.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaFilter {
    pub status: Option<MediaStatus>,
    pub content_type: Option<ContentType>,
    pub visibility: Option<Visibility>,
    pub language: Option<String>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    /// Only items attached to the term with this key.
    pub taxonomy_key: Option<String>,
    /// Apply the public visibility gate evaluated at this instant.
    pub public_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    #[default]
    UpdatedAt,
    PublishedAt,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaOrder {
    pub field: SortField,
    pub descending: bool,
}

impl Default for MediaOrder {
    fn default() -> Self {
        Self {
            field: SortField::UpdatedAt,
            descending: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaQuery {
    pub filter: MediaFilter,
    pub order: MediaOrder,
    pub range: PageRange,
}

impl MediaQuery {
    /// Public-site listing: gate applied at `now`, newest publication first.
    pub fn public(now: Timestamp) -> Self {
        Self {
            filter: MediaFilter {
                public_at: Some(now),
                ..Default::default()
            },
            order: MediaOrder {
                field: SortField::PublishedAt,
                descending: true,
            },
            range: PageRange::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Write shapes
// ---------------------------------------------------------------------------

/// A new Draft item.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDraft {
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub seo: SeoMeta,
    pub language: String,
    pub content_type: ContentType,
    pub visibility: Visibility,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionWrite {
    /// Open a new review cycle in `Submitted`.
    Open { submitted_by: DbId },
    /// Resolve an open submission. Only applies while it is still `Submitted`.
    Resolve {
        submission_id: DbId,
        state: SubmissionState,
        reviewer_id: DbId,
    },
}

/// Everything one transition writes, applied atomically.
///
/// The item row is only updated while its persisted status still equals
/// `expected_status`; otherwise nothing is written.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionCommit {
    pub expected_status: MediaStatus,
    pub next: MediaItem,
    pub submission: Option<SubmissionWrite>,
    pub audit: NewAuditEntry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub item: MediaItem,
    pub submission: Option<Submission>,
    pub audit: AuditLogEntry,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn get_media(&self, id: DbId) -> Result<Option<MediaItem>, StoreError>;

    async fn get_media_by_slug(&self, slug: &str) -> Result<Option<MediaItem>, StoreError>;

    /// Insert a Draft item together with its `created` audit entry.
    async fn create_media(
        &self,
        draft: MediaDraft,
    ) -> Result<(MediaItem, AuditLogEntry), StoreError>;

    async fn query_media(&self, query: &MediaQuery) -> Result<Page<MediaItem>, StoreError>;

    /// Most recent submission by creation time; ties go to the greater id.
    async fn latest_submission(&self, media_id: DbId) -> Result<Option<Submission>, StoreError>;

    /// All submissions for an item, newest first.
    async fn list_submissions(&self, media_id: DbId) -> Result<Vec<Submission>, StoreError>;

    /// Apply a transition. `Ok(None)` means the compare-and-set failed and
    /// nothing was written.
    async fn commit(
        &self,
        commit: TransitionCommit,
    ) -> Result<Option<TransitionOutcome>, StoreError>;
}

#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Entries matching the query, newest first.
    async fn list_audit(&self, query: &AuditQuery) -> Result<Page<AuditLogEntry>, StoreError>;
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn insert_asset(&self, asset: NewAsset) -> Result<Asset, StoreError>;

    async fn get_asset(&self, id: DbId) -> Result<Option<Asset>, StoreError>;

    async fn list_assets(&self, media_id: DbId) -> Result<Vec<Asset>, StoreError>;

    /// Returns `false` when no such asset existed.
    async fn delete_asset(&self, id: DbId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait TaxonomyStore: Send + Sync {
    async fn create_term(&self, term: NewTerm) -> Result<TaxonomyTerm, StoreError>;

    async fn get_term(&self, id: DbId) -> Result<Option<TaxonomyTerm>, StoreError>;

    async fn list_terms(&self, kind: Option<TaxonomyKind>)
        -> Result<Vec<TaxonomyTerm>, StoreError>;

    /// Idempotent. Returns `true` when a new association was created.
    async fn attach_term(&self, media_id: DbId, term_id: DbId) -> Result<bool, StoreError>;

    /// Returns `true` when an association was removed.
    async fn detach_term(&self, media_id: DbId, term_id: DbId) -> Result<bool, StoreError>;

    async fn terms_for_media(&self, media_id: DbId) -> Result<Vec<TaxonomyTerm>, StoreError>;
}

/// Health probe for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Every store contract the HTTP layer needs, as one object.
pub trait ContentStore: MediaStore + AuditStore + AssetStore + TaxonomyStore + StoreHealth {}

impl<T> ContentStore for T where
    T: MediaStore + AuditStore + AssetStore + TaxonomyStore + StoreHealth
{
}

/// Binary object storage for uploaded assets.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` at `path`, returning its public URL.
    async fn put(&self, path: &str, data: Vec<u8>, mime_type: &str) -> Result<String, StoreError>;

    /// Remove the object at `path`. Missing objects are not an error.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}
