//! In-process implementation of every store contract.
//!
//! All state lives behind one lock so a [`TransitionCommit`] is applied
//! atomically, matching the transactional Postgres store.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use super::{
    AssetStore, AuditStore, MediaDraft, MediaOrder, MediaQuery, MediaStore, ObjectStore, Page,
    PageRange, SortField, StoreError, StoreHealth, SubmissionWrite, TaxonomyStore,
    TransitionCommit, TransitionOutcome,
};
use crate::asset::{Asset, NewAsset};
use crate::audit::{AuditDiff, AuditLogEntry, AuditQuery, NewAuditEntry};
use crate::media::{MediaItem, MediaStatus, Submission, SubmissionState};
use crate::taxonomy::{NewTerm, TaxonomyKind, TaxonomyTerm};
use crate::types::DbId;
use crate::visibility::is_publicly_visible;

#[derive(Debug, Default)]
struct State {
    last_id: DbId,
    media: BTreeMap<DbId, MediaItem>,
    submissions: Vec<Submission>,
    audit: Vec<AuditLogEntry>,
    assets: BTreeMap<DbId, Asset>,
    terms: BTreeMap<DbId, TaxonomyTerm>,
    /// `(media_id, term_id)` associations.
    media_terms: BTreeSet<(DbId, DbId)>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn slug_taken(&self, slug: &str, except: Option<DbId>) -> bool {
        self.media
            .values()
            .any(|m| m.slug == slug && Some(m.id) != except)
    }

    fn append_audit(&mut self, entry: NewAuditEntry) -> AuditLogEntry {
        let id = self.next_id();
        let entry = AuditLogEntry::from_new(id, entry);
        self.audit.push(entry.clone());
        entry
    }

    fn matches_taxonomy(&self, media_id: DbId, key: &str) -> bool {
        self.terms
            .values()
            .filter(|t| t.key == key)
            .any(|t| self.media_terms.contains(&(media_id, t.id)))
    }
}

/// Store backed by in-process maps. Ids are assigned from one counter.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_conflict(operation: &'static str, slug: &str) -> StoreError {
    StoreError::Conflict {
        operation,
        detail: format!("Slug '{slug}' is already in use"),
    }
}

fn compare_media(a: &MediaItem, b: &MediaItem, order: MediaOrder) -> Ordering {
    let primary = match order.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::PublishedAt => a.published_at.cmp(&b.published_at),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    };
    let ordering = primary.then(a.id.cmp(&b.id));
    if order.descending {
        ordering.reverse()
    } else {
        ordering
    }
}

fn paginate<T: Clone>(rows: Vec<T>, range: PageRange) -> Page<T> {
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(range.offset as usize)
        .take(range.limit as usize)
        .collect();
    Page { items, total }
}

#[async_trait]
impl MediaStore for InMemoryStore {
    async fn get_media(&self, id: DbId) -> Result<Option<MediaItem>, StoreError> {
        Ok(self.state.read().await.media.get(&id).cloned())
    }

    async fn get_media_by_slug(&self, slug: &str) -> Result<Option<MediaItem>, StoreError> {
        let state = self.state.read().await;
        Ok(state.media.values().find(|m| m.slug == slug).cloned())
    }

    async fn create_media(
        &self,
        draft: MediaDraft,
    ) -> Result<(MediaItem, AuditLogEntry), StoreError> {
        let mut state = self.state.write().await;
        if state.slug_taken(&draft.slug, None) {
            return Err(slug_conflict("media.create", &draft.slug));
        }

        let id = state.next_id();
        let item = MediaItem {
            id,
            slug: draft.slug,
            title: draft.title,
            summary: draft.summary,
            body: draft.body,
            seo: draft.seo,
            language: draft.language,
            content_type: draft.content_type,
            status: MediaStatus::Draft,
            visibility: draft.visibility,
            published_at: None,
            created_by: draft.created_by,
            created_at: draft.created_at,
            updated_at: draft.created_at,
        };
        state.media.insert(id, item.clone());

        let audit = state.append_audit(NewAuditEntry::for_media(
            draft.created_by,
            id,
            AuditDiff::Created {
                status: item.status,
                visibility: item.visibility,
            },
            draft.created_at,
        ));
        Ok((item, audit))
    }

    async fn query_media(&self, query: &MediaQuery) -> Result<Page<MediaItem>, StoreError> {
        let state = self.state.read().await;
        let filter = &query.filter;
        let search = filter.search.as_deref().map(str::to_lowercase);

        let mut rows: Vec<MediaItem> = state
            .media
            .values()
            .filter(|m| filter.status.is_none_or(|s| m.status == s))
            .filter(|m| filter.content_type.is_none_or(|c| m.content_type == c))
            .filter(|m| filter.visibility.is_none_or(|v| m.visibility == v))
            .filter(|m| filter.language.as_deref().is_none_or(|l| m.language == l))
            .filter(|m| {
                search
                    .as_deref()
                    .is_none_or(|s| m.title.to_lowercase().contains(s))
            })
            .filter(|m| {
                filter
                    .taxonomy_key
                    .as_deref()
                    .is_none_or(|key| state.matches_taxonomy(m.id, key))
            })
            .filter(|m| filter.public_at.is_none_or(|now| is_publicly_visible(m, now)))
            .cloned()
            .collect();

        rows.sort_by(|a, b| compare_media(a, b, query.order));
        Ok(paginate(rows, query.range))
    }

    async fn latest_submission(&self, media_id: DbId) -> Result<Option<Submission>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .submissions
            .iter()
            .filter(|s| s.media_id == media_id)
            .max_by_key(|s| s.recency_key())
            .cloned())
    }

    async fn list_submissions(&self, media_id: DbId) -> Result<Vec<Submission>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<Submission> = state
            .submissions
            .iter()
            .filter(|s| s.media_id == media_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| std::cmp::Reverse(s.recency_key()));
        Ok(rows)
    }

    async fn commit(
        &self,
        commit: TransitionCommit,
    ) -> Result<Option<TransitionOutcome>, StoreError> {
        let mut state = self.state.write().await;
        let id = commit.next.id;

        match state.media.get(&id) {
            Some(current) if current.status == commit.expected_status => {}
            _ => return Ok(None),
        }
        if state.slug_taken(&commit.next.slug, Some(id)) {
            return Err(slug_conflict("media.commit", &commit.next.slug));
        }

        // Resolve is checked before anything is written.
        let resolve_index = match &commit.submission {
            Some(SubmissionWrite::Resolve { submission_id, .. }) => {
                let found = state.submissions.iter().position(|s| {
                    s.id == *submission_id
                        && s.media_id == id
                        && s.state == SubmissionState::Submitted
                });
                match found {
                    Some(index) => Some(index),
                    None => return Ok(None),
                }
            }
            _ => None,
        };

        let at = commit.audit.timestamp;
        let submission = match commit.submission {
            None => None,
            Some(SubmissionWrite::Open { submitted_by }) => {
                let submission = Submission {
                    id: state.next_id(),
                    media_id: id,
                    state: SubmissionState::Submitted,
                    submitted_by,
                    reviewer_id: None,
                    created_at: at,
                    decided_at: None,
                };
                state.submissions.push(submission.clone());
                Some(submission)
            }
            Some(SubmissionWrite::Resolve {
                state: resolved,
                reviewer_id,
                ..
            }) => resolve_index.map(|index| {
                let row = &mut state.submissions[index];
                row.state = resolved;
                row.reviewer_id = Some(reviewer_id);
                row.decided_at = Some(at);
                row.clone()
            }),
        };

        state.media.insert(id, commit.next.clone());
        let audit = state.append_audit(commit.audit);

        Ok(Some(TransitionOutcome {
            item: commit.next,
            submission,
            audit,
        }))
    }
}

#[async_trait]
impl AuditStore for InMemoryStore {
    async fn list_audit(&self, query: &AuditQuery) -> Result<Page<AuditLogEntry>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<AuditLogEntry> = state
            .audit
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(paginate(rows, PageRange::clamp(query.limit, query.offset)))
    }
}

#[async_trait]
impl AssetStore for InMemoryStore {
    async fn insert_asset(&self, asset: NewAsset) -> Result<Asset, StoreError> {
        let mut state = self.state.write().await;
        let id = state.next_id();
        let row = Asset {
            id,
            media_id: asset.media_id,
            storage_path: asset.storage_path,
            public_url: asset.public_url,
            mime_type: asset.mime_type,
            byte_size: asset.byte_size,
            width: asset.width,
            height: asset.height,
            duration_secs: asset.duration_secs,
            checksum: asset.checksum,
            kind: asset.kind,
            uploaded_by: asset.uploaded_by,
            created_at: chrono::Utc::now(),
        };
        state.assets.insert(id, row.clone());
        Ok(row)
    }

    async fn get_asset(&self, id: DbId) -> Result<Option<Asset>, StoreError> {
        Ok(self.state.read().await.assets.get(&id).cloned())
    }

    async fn list_assets(&self, media_id: DbId) -> Result<Vec<Asset>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .assets
            .values()
            .filter(|a| a.media_id == media_id)
            .cloned()
            .collect())
    }

    async fn delete_asset(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.state.write().await.assets.remove(&id).is_some())
    }
}

#[async_trait]
impl TaxonomyStore for InMemoryStore {
    async fn create_term(&self, term: NewTerm) -> Result<TaxonomyTerm, StoreError> {
        let mut state = self.state.write().await;
        if state
            .terms
            .values()
            .any(|t| t.kind == term.kind && t.key == term.key)
        {
            return Err(StoreError::Conflict {
                operation: "taxonomy.create",
                detail: format!("Term '{}' already exists for {}", term.key, term.kind),
            });
        }
        let id = state.next_id();
        let row = TaxonomyTerm {
            id,
            kind: term.kind,
            label: term.label,
            key: term.key,
            created_at: chrono::Utc::now(),
        };
        state.terms.insert(id, row.clone());
        Ok(row)
    }

    async fn get_term(&self, id: DbId) -> Result<Option<TaxonomyTerm>, StoreError> {
        Ok(self.state.read().await.terms.get(&id).cloned())
    }

    async fn list_terms(
        &self,
        kind: Option<TaxonomyKind>,
    ) -> Result<Vec<TaxonomyTerm>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<TaxonomyTerm> = state
            .terms
            .values()
            .filter(|t| kind.is_none_or(|k| t.kind == k))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.kind.name().cmp(b.kind.name()).then(a.label.cmp(&b.label)));
        Ok(rows)
    }

    async fn attach_term(&self, media_id: DbId, term_id: DbId) -> Result<bool, StoreError> {
        Ok(self.state.write().await.media_terms.insert((media_id, term_id)))
    }

    async fn detach_term(&self, media_id: DbId, term_id: DbId) -> Result<bool, StoreError> {
        Ok(self.state.write().await.media_terms.remove(&(media_id, term_id)))
    }

    async fn terms_for_media(&self, media_id: DbId) -> Result<Vec<TaxonomyTerm>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<TaxonomyTerm> = state
            .media_terms
            .iter()
            .filter(|(m, _)| *m == media_id)
            .filter_map(|(_, t)| state.terms.get(t).cloned())
            .collect();
        rows.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(rows)
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Object storage held in memory. Public URLs are `{base_url}/{path}`.
#[derive(Debug)]
pub struct InMemoryObjectStore {
    base_url: String,
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Stored bytes and MIME type at `path`, if any.
    pub async fn get(&self, path: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().await.get(path).cloned()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.lock().await.len()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, path: &str, data: Vec<u8>, mime_type: &str) -> Result<String, StoreError> {
        self.objects
            .lock()
            .await
            .insert(path.to_string(), (data, mime_type.to_string()));
        Ok(format!("{}/{}", self.base_url, path))
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.objects.lock().await.remove(path);
        Ok(())
    }
}
