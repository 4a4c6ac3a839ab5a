//! Applies guarded workflow transitions against a [`MediaStore`].
//!
//! Every operation takes the caller explicitly, checks roles before reading,
//! re-reads the persisted item, and writes item, submission and audit entry
//! in one compare-and-set commit.

use std::sync::Arc;

use crate::audit::{content_changes, AuditDiff, Change, NewAuditEntry};
use crate::clock::Clock;
use crate::error::CoreError;
use crate::media::{MediaItem, MediaUpdate, NewMediaItem, Submission, SubmissionState};
use crate::roles::{Caller, EDIT_ROLES};
use crate::store::{MediaDraft, MediaStore, SubmissionWrite, TransitionCommit, TransitionOutcome};
use crate::types::{DbId, Timestamp};

use super::schedule::ensure_future;
use super::transition::{authorize, check_source, RoleGrant, Transition};

pub struct WorkflowEngine<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized> Clone for WorkflowEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: MediaStore + ?Sized> WorkflowEngine<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Insert a new Draft item. Requires an edit-capable role.
    pub async fn create(
        &self,
        caller: &Caller,
        input: NewMediaItem,
    ) -> Result<TransitionOutcome, CoreError> {
        let result = self.try_create(caller, input).await;
        let media_id = result.as_ref().ok().map(|o| o.item.id);
        traced("create", media_id, caller, result)
    }

    async fn try_create(
        &self,
        caller: &Caller,
        input: NewMediaItem,
    ) -> Result<TransitionOutcome, CoreError> {
        if !caller.has_any(EDIT_ROLES) {
            return Err(CoreError::PermissionDenied(
                "create requires one of: admin, editor, provider".into(),
            ));
        }
        let slug = input.validate()?;
        let draft = MediaDraft {
            slug,
            title: input.title.trim().to_string(),
            summary: input.summary,
            body: input.body,
            seo: input.seo,
            language: input.language,
            content_type: input.content_type,
            visibility: input.visibility,
            created_by: caller.id,
            created_at: self.clock.now(),
        };
        let (item, audit) = self.store.create_media(draft).await?;
        Ok(TransitionOutcome {
            item,
            submission: None,
            audit,
        })
    }

    /// Update content fields. Status is unchanged.
    pub async fn edit(
        &self,
        caller: &Caller,
        id: DbId,
        update: MediaUpdate,
    ) -> Result<TransitionOutcome, CoreError> {
        let result = self.try_edit(caller, id, update).await;
        traced(Transition::Edit.name(), Some(id), caller, result)
    }

    async fn try_edit(
        &self,
        caller: &Caller,
        id: DbId,
        update: MediaUpdate,
    ) -> Result<TransitionOutcome, CoreError> {
        let transition = Transition::Edit;
        authorize(transition, &caller.roles)?;
        let current = self.load(id).await?;
        check_source(transition, current.status)?;
        update.validate()?;

        let now = self.clock.now();
        let mut next = update.apply(&current);
        let fields = content_changes(&current, &next);
        if fields.is_empty() {
            return Err(CoreError::Validation("Update contains no changes".into()));
        }
        next.updated_at = now.max(current.updated_at);

        self.commit(
            transition,
            &current,
            next,
            None,
            AuditDiff::Updated { fields },
            caller,
            now,
        )
        .await
    }

    /// Draft → InReview, opening a new submission.
    pub async fn submit_for_review(
        &self,
        caller: &Caller,
        id: DbId,
    ) -> Result<TransitionOutcome, CoreError> {
        let result = self.try_submit(caller, id).await;
        traced(Transition::SubmitForReview.name(), Some(id), caller, result)
    }

    async fn try_submit(&self, caller: &Caller, id: DbId) -> Result<TransitionOutcome, CoreError> {
        let transition = Transition::SubmitForReview;
        authorize(transition, &caller.roles)?;
        let current = self.load(id).await?;
        check_source(transition, current.status)?;

        let now = self.clock.now();
        let next = step(&current, transition, now);
        let diff = AuditDiff::Submitted {
            status: Change::new(current.status, next.status),
            submission_state: SubmissionState::Submitted,
        };
        let open = SubmissionWrite::Open {
            submitted_by: caller.id,
        };
        self.commit(transition, &current, next, Some(open), diff, caller, now)
            .await
    }

    /// InReview → Scheduled. An existing publish time is kept; otherwise the
    /// approval instant becomes the publish time.
    ///
    /// A public item approved without a prior `schedule` is therefore visible
    /// on the public site immediately. A later `publish_now` moves its
    /// publish time to the publish instant.
    pub async fn approve(&self, caller: &Caller, id: DbId) -> Result<TransitionOutcome, CoreError> {
        let result = self.try_review(caller, id, Transition::Approve).await;
        traced(Transition::Approve.name(), Some(id), caller, result)
    }

    /// InReview → Draft.
    pub async fn reject(&self, caller: &Caller, id: DbId) -> Result<TransitionOutcome, CoreError> {
        let result = self.try_review(caller, id, Transition::Reject).await;
        traced(Transition::Reject.name(), Some(id), caller, result)
    }

    async fn try_review(
        &self,
        caller: &Caller,
        id: DbId,
        transition: Transition,
    ) -> Result<TransitionOutcome, CoreError> {
        authorize(transition, &caller.roles)?;
        let current = self.load(id).await?;
        check_source(transition, current.status)?;
        let open = self.open_submission(&current).await?;

        let now = self.clock.now();
        let mut next = step(&current, transition, now);
        let (resolved, diff) = if transition == Transition::Approve {
            next.published_at = current.published_at.or(Some(now));
            let diff = AuditDiff::Approved {
                status: Change::new(current.status, next.status),
                published_at: Change::if_changed(current.published_at, next.published_at),
                submission_state: Change::new(open.state, SubmissionState::Approved),
            };
            (SubmissionState::Approved, diff)
        } else {
            let diff = AuditDiff::Rejected {
                status: Change::new(current.status, next.status),
                submission_state: Change::new(open.state, SubmissionState::Rejected),
            };
            (SubmissionState::Rejected, diff)
        };

        let resolve = SubmissionWrite::Resolve {
            submission_id: open.id,
            state: resolved,
            reviewer_id: caller.id,
        };
        self.commit(transition, &current, next, Some(resolve), diff, caller, now)
            .await
    }

    /// Draft or Scheduled → Published with the publish time set to now.
    pub async fn publish_now(
        &self,
        caller: &Caller,
        id: DbId,
    ) -> Result<TransitionOutcome, CoreError> {
        let result = self.try_publication(caller, id, Transition::PublishNow).await;
        traced(Transition::PublishNow.name(), Some(id), caller, result)
    }

    /// Published → Draft, clearing the publish time.
    pub async fn unpublish(&self, caller: &Caller, id: DbId) -> Result<TransitionOutcome, CoreError> {
        let result = self.try_publication(caller, id, Transition::Unpublish).await;
        traced(Transition::Unpublish.name(), Some(id), caller, result)
    }

    async fn try_publication(
        &self,
        caller: &Caller,
        id: DbId,
        transition: Transition,
    ) -> Result<TransitionOutcome, CoreError> {
        let grant = authorize(transition, &caller.roles)?;
        let current = self.load(id).await?;
        check_source(transition, current.status)?;
        if grant == RoleGrant::RequiresApprovedSubmission {
            self.require_approved_submission(&current, transition).await?;
        }

        let now = self.clock.now();
        let mut next = step(&current, transition, now);
        next.published_at = match transition {
            Transition::PublishNow => Some(now),
            _ => None,
        };
        let status = Change::new(current.status, next.status);
        let published_at = Change::new(current.published_at, next.published_at);
        let diff = match transition {
            Transition::PublishNow => AuditDiff::Published {
                status,
                published_at,
            },
            _ => AuditDiff::Unpublished {
                status,
                published_at,
            },
        };
        self.commit(transition, &current, next, None, diff, caller, now)
            .await
    }

    /// Schedule publication at `publish_at`, which must be strictly in the
    /// future.
    pub async fn schedule(
        &self,
        caller: &Caller,
        id: DbId,
        publish_at: Timestamp,
    ) -> Result<TransitionOutcome, CoreError> {
        let result = self.try_schedule(caller, id, publish_at).await;
        traced(Transition::Schedule.name(), Some(id), caller, result)
    }

    async fn try_schedule(
        &self,
        caller: &Caller,
        id: DbId,
        publish_at: Timestamp,
    ) -> Result<TransitionOutcome, CoreError> {
        let transition = Transition::Schedule;
        authorize(transition, &caller.roles)?;
        let now = self.clock.now();
        ensure_future(publish_at, now)?;
        let current = self.load(id).await?;
        check_source(transition, current.status)?;

        let mut next = step(&current, transition, now);
        next.published_at = Some(publish_at);
        let diff = AuditDiff::Scheduled {
            status: Change::if_changed(current.status, next.status),
            published_at: Change::new(current.published_at, next.published_at),
        };
        self.commit(transition, &current, next, None, diff, caller, now)
            .await
    }

    /// Move an item to the terminal Archived status. Admin only.
    pub async fn archive(&self, caller: &Caller, id: DbId) -> Result<TransitionOutcome, CoreError> {
        let result = self.try_archive(caller, id).await;
        traced(Transition::Archive.name(), Some(id), caller, result)
    }

    async fn try_archive(&self, caller: &Caller, id: DbId) -> Result<TransitionOutcome, CoreError> {
        let transition = Transition::Archive;
        authorize(transition, &caller.roles)?;
        let current = self.load(id).await?;
        check_source(transition, current.status)?;

        let now = self.clock.now();
        let next = step(&current, transition, now);
        let diff = AuditDiff::Archived {
            status: Change::new(current.status, next.status),
        };
        self.commit(transition, &current, next, None, diff, caller, now)
            .await
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn load(&self, id: DbId) -> Result<MediaItem, CoreError> {
        self.store
            .get_media(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "MediaItem",
                id,
            })
    }

    /// The latest submission, which must still be awaiting a decision.
    async fn open_submission(&self, item: &MediaItem) -> Result<Submission, CoreError> {
        match self.store.latest_submission(item.id).await? {
            Some(submission) if submission.state == SubmissionState::Submitted => Ok(submission),
            _ => Err(CoreError::NotFound {
                entity: "open Submission for MediaItem",
                id: item.id,
            }),
        }
    }

    async fn require_approved_submission(
        &self,
        item: &MediaItem,
        transition: Transition,
    ) -> Result<(), CoreError> {
        let latest = self.store.latest_submission(item.id).await?;
        if latest.is_some_and(|s| s.state == SubmissionState::Approved) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied(format!(
                "Editors may only {transition} items whose latest submission is approved"
            )))
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn commit(
        &self,
        transition: Transition,
        current: &MediaItem,
        next: MediaItem,
        submission: Option<SubmissionWrite>,
        diff: AuditDiff,
        caller: &Caller,
        now: Timestamp,
    ) -> Result<TransitionOutcome, CoreError> {
        if next.status.requires_publish_time() && next.published_at.is_none() {
            return Err(CoreError::Validation(format!(
                "A {} media item must have a publish time",
                next.status
            )));
        }
        let commit = TransitionCommit {
            expected_status: current.status,
            next,
            submission,
            audit: NewAuditEntry::for_media(caller.id, current.id, diff, now),
        };
        match self.store.commit(commit).await? {
            Some(outcome) => Ok(outcome),
            None => {
                // Another writer moved the item first; report its status.
                let latest = self.load(current.id).await?;
                Err(CoreError::PreconditionFailed {
                    transition,
                    status: latest.status,
                })
            }
        }
    }
}

/// Copy of `current` moved to the transition's target status.
fn step(current: &MediaItem, transition: Transition, now: Timestamp) -> MediaItem {
    let mut next = current.clone();
    next.status = transition.target(current.status);
    next.updated_at = now.max(current.updated_at);
    next
}

fn traced<T>(
    operation: &str,
    media_id: Option<DbId>,
    caller: &Caller,
    result: Result<T, CoreError>,
) -> Result<T, CoreError> {
    match &result {
        Ok(_) => tracing::info!(operation, media_id, actor_id = caller.id, "Workflow transition applied"),
        Err(e) if e.is_guard_failure() => {
            tracing::debug!(operation, media_id, actor_id = caller.id, error = %e, "Workflow transition refused")
        }
        Err(e @ (CoreError::NotFound { .. } | CoreError::Conflict(_))) => {
            tracing::warn!(operation, media_id, actor_id = caller.id, error = %e, "Workflow transition failed")
        }
        Err(e) => {
            tracing::error!(operation, media_id, actor_id = caller.id, error = %e, "Workflow transition failed")
        }
    }
    result
}
