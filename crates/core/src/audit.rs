//! Audit trail for workflow transitions.
//!
//! Each successful transition produces exactly one [`NewAuditEntry`]. The
//! diff is a closed enum with one variant per action, carrying only the
//! fields the transition changed, so consumers can match exhaustively.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::media::{MediaItem, MediaStatus, SubmissionState, Visibility};
use crate::types::{define_text_enum, DbId, Timestamp};

/// Entity type recorded for media item audit entries.
pub const ENTITY_MEDIA_ITEM: &str = "media_item";

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

define_text_enum! {
    /// Past-tense transition names.
    AuditAction {
        Created = "created",
        Updated = "updated",
        Submitted = "submitted",
        Approved = "approved",
        Rejected = "rejected",
        Published = "published",
        Unpublished = "unpublished",
        Archived = "archived",
        Scheduled = "scheduled",
    }
}

define_text_enum! {
    /// Content fields tracked by `updated` diffs.
    ContentField {
        Slug = "slug",
        Title = "title",
        Summary = "summary",
        Body = "body",
        SeoTitle = "seo_title",
        SeoDescription = "seo_description",
        CanonicalUrl = "canonical_url",
        Language = "language",
        ContentType = "content_type",
        Visibility = "visibility",
    }
}

// ---------------------------------------------------------------------------
// Diff shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change<T> {
    pub before: T,
    pub after: T,
}

impl<T: PartialEq> Change<T> {
    pub fn new(before: T, after: T) -> Self {
        Self { before, after }
    }

    /// `Some` only when the value actually changed.
    pub fn if_changed(before: T, after: T) -> Option<Self> {
        if before == after {
            None
        } else {
            Some(Self { before, after })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: ContentField,
    pub before: Value,
    pub after: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditDiff {
    Created {
        status: MediaStatus,
        visibility: Visibility,
    },
    Updated {
        fields: Vec<FieldChange>,
    },
    Submitted {
        status: Change<MediaStatus>,
        submission_state: SubmissionState,
    },
    Approved {
        status: Change<MediaStatus>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        published_at: Option<Change<Option<Timestamp>>>,
        submission_state: Change<SubmissionState>,
    },
    Rejected {
        status: Change<MediaStatus>,
        submission_state: Change<SubmissionState>,
    },
    Published {
        status: Change<MediaStatus>,
        published_at: Change<Option<Timestamp>>,
    },
    Unpublished {
        status: Change<MediaStatus>,
        published_at: Change<Option<Timestamp>>,
    },
    Scheduled {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<Change<MediaStatus>>,
        published_at: Change<Option<Timestamp>>,
    },
    Archived {
        status: Change<MediaStatus>,
    },
}

impl AuditDiff {
    pub fn action(&self) -> AuditAction {
        match self {
            AuditDiff::Created { .. } => AuditAction::Created,
            AuditDiff::Updated { .. } => AuditAction::Updated,
            AuditDiff::Submitted { .. } => AuditAction::Submitted,
            AuditDiff::Approved { .. } => AuditAction::Approved,
            AuditDiff::Rejected { .. } => AuditAction::Rejected,
            AuditDiff::Published { .. } => AuditAction::Published,
            AuditDiff::Unpublished { .. } => AuditAction::Unpublished,
            AuditDiff::Scheduled { .. } => AuditAction::Scheduled,
            AuditDiff::Archived { .. } => AuditAction::Archived,
        }
    }

    /// Snapshot of the changed fields before the transition.
    pub fn before(&self) -> Value {
        self.snapshot(Side::Before)
    }

    /// Snapshot of the changed fields after the transition.
    pub fn after(&self) -> Value {
        self.snapshot(Side::After)
    }

    /// Names of the fields this diff records, in snapshot order.
    pub fn changed_fields(&self) -> Vec<String> {
        match self.after() {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn snapshot(&self, side: Side) -> Value {
        let mut map = Map::new();
        match self {
            AuditDiff::Created { status, visibility } => {
                if side == Side::After {
                    map.insert("status".into(), json!(status));
                    map.insert("visibility".into(), json!(visibility));
                }
            }
            AuditDiff::Updated { fields } => {
                for change in fields {
                    let value = match side {
                        Side::Before => change.before.clone(),
                        Side::After => change.after.clone(),
                    };
                    map.insert(change.field.name().into(), value);
                }
            }
            AuditDiff::Submitted {
                status,
                submission_state,
            } => {
                map.insert("status".into(), side.pick(status));
                if side == Side::After {
                    map.insert("submission_state".into(), json!(submission_state));
                }
            }
            AuditDiff::Approved {
                status,
                published_at,
                submission_state,
            } => {
                map.insert("status".into(), side.pick(status));
                if let Some(published_at) = published_at {
                    map.insert("published_at".into(), side.pick(published_at));
                }
                map.insert("submission_state".into(), side.pick(submission_state));
            }
            AuditDiff::Rejected {
                status,
                submission_state,
            } => {
                map.insert("status".into(), side.pick(status));
                map.insert("submission_state".into(), side.pick(submission_state));
            }
            AuditDiff::Published {
                status,
                published_at,
            }
            | AuditDiff::Unpublished {
                status,
                published_at,
            } => {
                map.insert("status".into(), side.pick(status));
                map.insert("published_at".into(), side.pick(published_at));
            }
            AuditDiff::Scheduled {
                status,
                published_at,
            } => {
                if let Some(status) = status {
                    map.insert("status".into(), side.pick(status));
                }
                map.insert("published_at".into(), side.pick(published_at));
            }
            AuditDiff::Archived { status } => {
                map.insert("status".into(), side.pick(status));
            }
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

impl Side {
    fn pick<T: Serialize>(self, change: &Change<T>) -> Value {
        match self {
            Side::Before => json!(change.before),
            Side::After => json!(change.after),
        }
    }
}

/// Content-field differences between two versions of an item.
///
/// Status, publish time and timestamps are not content and are ignored.
pub fn content_changes(before: &MediaItem, after: &MediaItem) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let mut push = |field: ContentField, b: Value, a: Value| {
        if b != a {
            changes.push(FieldChange {
                field,
                before: b,
                after: a,
            });
        }
    };

    push(ContentField::Slug, json!(before.slug), json!(after.slug));
    push(ContentField::Title, json!(before.title), json!(after.title));
    push(ContentField::Summary, json!(before.summary), json!(after.summary));
    push(ContentField::Body, json!(before.body), json!(after.body));
    push(
        ContentField::SeoTitle,
        json!(before.seo.title),
        json!(after.seo.title),
    );
    push(
        ContentField::SeoDescription,
        json!(before.seo.description),
        json!(after.seo.description),
    );
    push(
        ContentField::CanonicalUrl,
        json!(before.seo.canonical_url),
        json!(after.seo.canonical_url),
    );
    push(
        ContentField::Language,
        json!(before.language),
        json!(after.language),
    );
    push(
        ContentField::ContentType,
        json!(before.content_type),
        json!(after.content_type),
    );
    push(
        ContentField::Visibility,
        json!(before.visibility),
        json!(after.visibility),
    );

    changes
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// An entry about to be appended. The action is derived from the diff.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub actor_id: DbId,
    pub timestamp: Timestamp,
    pub entity_type: &'static str,
    pub entity_id: DbId,
    pub diff: AuditDiff,
}

impl NewAuditEntry {
    pub fn for_media(actor_id: DbId, media_id: DbId, diff: AuditDiff, at: Timestamp) -> Self {
        Self {
            actor_id,
            timestamp: at,
            entity_type: ENTITY_MEDIA_ITEM,
            entity_id: media_id,
            diff,
        }
    }

    pub fn action(&self) -> AuditAction {
        self.diff.action()
    }
}

/// A persisted, immutable audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: DbId,
    pub action: AuditAction,
    pub actor_id: DbId,
    pub timestamp: Timestamp,
    pub entity_type: String,
    pub entity_id: DbId,
    pub diff: AuditDiff,
}

impl AuditLogEntry {
    pub fn from_new(id: DbId, entry: NewAuditEntry) -> Self {
        Self {
            id,
            action: entry.action(),
            actor_id: entry.actor_id,
            timestamp: entry.timestamp,
            entity_type: entry.entity_type.to_string(),
            entity_id: entry.entity_id,
            diff: entry.diff,
        }
    }
}

/// Filter parameters for querying audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub actor_id: Option<DbId>,
    pub action: Option<AuditAction>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl AuditQuery {
    pub fn for_media(media_id: DbId) -> Self {
        Self {
            entity_type: Some(ENTITY_MEDIA_ITEM.to_string()),
            entity_id: Some(media_id),
            ..Default::default()
        }
    }

    /// In-memory equivalent of the SQL filter.
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        self.actor_id.is_none_or(|id| entry.actor_id == id)
            && self.action.is_none_or(|a| entry.action == a)
            && self
                .entity_type
                .as_deref()
                .is_none_or(|t| entry.entity_type == t)
            && self.entity_id.is_none_or(|id| entry.entity_id == id)
            && self.from.is_none_or(|from| entry.timestamp >= from)
            && self.to.is_none_or(|to| entry.timestamp <= to)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ts(hour: u32) -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2026, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn diff_determines_action() {
        let diff = AuditDiff::Archived {
            status: Change::new(MediaStatus::Draft, MediaStatus::Archived),
        };
        let entry = NewAuditEntry::for_media(1, 2, diff, ts(9));
        assert_eq!(entry.action(), AuditAction::Archived);
        assert_eq!(entry.entity_type, ENTITY_MEDIA_ITEM);
    }

    #[test]
    fn publish_diff_lists_status_and_published_at_only() {
        let diff = AuditDiff::Published {
            status: Change::new(MediaStatus::Scheduled, MediaStatus::Published),
            published_at: Change::new(Some(ts(12)), Some(ts(10))),
        };
        let mut fields = diff.changed_fields();
        fields.sort();
        assert_eq!(fields, vec!["published_at", "status"]);
        assert_eq!(diff.before()["status"], "scheduled");
        assert_eq!(diff.after()["status"], "published");
    }

    #[test]
    fn scheduled_diff_omits_unchanged_status() {
        let diff = AuditDiff::Scheduled {
            status: Change::if_changed(MediaStatus::Scheduled, MediaStatus::Scheduled),
            published_at: Change::new(Some(ts(10)), Some(ts(11))),
        };
        assert_eq!(diff.changed_fields(), vec!["published_at"]);
    }

    #[test]
    fn created_diff_has_empty_before() {
        let diff = AuditDiff::Created {
            status: MediaStatus::Draft,
            visibility: Visibility::Public,
        };
        assert_eq!(diff.before(), json!({}));
        assert_eq!(diff.after()["status"], "draft");
    }

    #[test]
    fn diff_json_is_tagged_and_round_trips() {
        let diff = AuditDiff::Rejected {
            status: Change::new(MediaStatus::InReview, MediaStatus::Draft),
            submission_state: Change::new(SubmissionState::Submitted, SubmissionState::Rejected),
        };
        let value = serde_json::to_value(&diff).unwrap();
        assert_eq!(value["kind"], "rejected");
        let parsed: AuditDiff = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, diff);
    }

    #[test]
    fn change_if_changed_detects_equality() {
        assert!(Change::if_changed(1, 1).is_none());
        assert_eq!(Change::if_changed(1, 2), Some(Change::new(1, 2)));
    }

    #[test]
    fn query_matches_entity_and_range() {
        let entry = AuditLogEntry::from_new(
            1,
            NewAuditEntry::for_media(
                5,
                9,
                AuditDiff::Archived {
                    status: Change::new(MediaStatus::Draft, MediaStatus::Archived),
                },
                ts(10),
            ),
        );
        assert!(AuditQuery::for_media(9).matches(&entry));
        assert!(!AuditQuery::for_media(8).matches(&entry));

        let window = AuditQuery {
            from: Some(ts(11)),
            ..Default::default()
        };
        assert!(!window.matches(&entry));
    }
}
