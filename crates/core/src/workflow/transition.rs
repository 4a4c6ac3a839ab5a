//! Transition table: allowed source statuses, role requirements, targets.

use crate::error::CoreError;
use crate::media::MediaStatus;
use crate::roles::{Role, RoleSet, EDIT_ROLES};
use crate::types::define_text_enum;

define_text_enum! {
    /// Named, guarded operations on a media item.
    Transition {
        Edit = "edit",
        SubmitForReview = "submit_for_review",
        Approve = "approve",
        Reject = "reject",
        PublishNow = "publish_now",
        Unpublish = "unpublish",
        Schedule = "schedule",
        Archive = "archive",
    }
}

/// Outcome of the role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGrant {
    /// The caller holds an unconditionally sufficient role.
    Granted,
    /// The caller qualifies only as an Editor; the latest submission must be
    /// Approved before the transition may proceed.
    RequiresApprovedSubmission,
}

const REVIEW_ROLES: &[Role] = &[Role::Admin, Role::Reviewer];

impl Transition {
    /// Roles that unconditionally permit the transition.
    pub fn required_roles(self) -> &'static [Role] {
        match self {
            Transition::SubmitForReview => &[Role::Admin, Role::Editor],
            Transition::Approve | Transition::Reject => REVIEW_ROLES,
            Transition::PublishNow | Transition::Unpublish => REVIEW_ROLES,
            Transition::Schedule | Transition::Edit => EDIT_ROLES,
            Transition::Archive => &[Role::Admin],
        }
    }

    /// Whether an Editor may perform the transition once the latest
    /// submission is Approved.
    fn editor_after_approval(self) -> bool {
        matches!(self, Transition::PublishNow | Transition::Unpublish)
    }

    pub fn allows_from(self, status: MediaStatus) -> bool {
        use MediaStatus::*;
        match self {
            Transition::SubmitForReview => status == Draft,
            Transition::Approve | Transition::Reject => status == InReview,
            Transition::PublishNow => matches!(status, Draft | Scheduled),
            Transition::Unpublish => status == Published,
            Transition::Schedule | Transition::Edit => !matches!(status, InReview | Archived),
            Transition::Archive => status != Archived,
        }
    }

    /// Resulting status when applied to an item currently in `from`.
    pub fn target(self, from: MediaStatus) -> MediaStatus {
        match self {
            Transition::SubmitForReview => MediaStatus::InReview,
            Transition::Approve | Transition::Schedule => MediaStatus::Scheduled,
            Transition::Reject | Transition::Unpublish => MediaStatus::Draft,
            Transition::PublishNow => MediaStatus::Published,
            Transition::Archive => MediaStatus::Archived,
            Transition::Edit => from,
        }
    }
}

/// Check the caller's roles. Runs before any state is read.
pub fn authorize(transition: Transition, roles: &RoleSet) -> Result<RoleGrant, CoreError> {
    if roles.intersects(transition.required_roles()) {
        return Ok(RoleGrant::Granted);
    }
    if transition.editor_after_approval() && roles.contains(Role::Editor) {
        return Ok(RoleGrant::RequiresApprovedSubmission);
    }

    let names: Vec<&str> = transition
        .required_roles()
        .iter()
        .map(|r| r.name())
        .collect();
    Err(CoreError::PermissionDenied(format!(
        "{transition} requires one of: {}",
        names.join(", ")
    )))
}

/// Check the persisted status against the allowed-from set.
pub fn check_source(transition: Transition, status: MediaStatus) -> Result<(), CoreError> {
    if transition.allows_from(status) {
        Ok(())
    } else {
        Err(CoreError::PreconditionFailed { transition, status })
    }
}
