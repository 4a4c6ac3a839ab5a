use crate::media::MediaStatus;
use crate::store::StoreError;
use crate::types::{DbId, Timestamp};
use crate::workflow::Transition;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Cannot {transition} a media item that is {status}")]
    PreconditionFailed {
        transition: Transition,
        status: MediaStatus,
    },

    #[error("Publish time {requested} is not after {now}")]
    InvalidSchedule { requested: Timestamp, now: Timestamp },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { detail, .. } => CoreError::Conflict(detail),
            other => CoreError::Store(other),
        }
    }
}

impl CoreError {
    /// Guard failures are expected outcomes of user actions, not faults.
    pub fn is_guard_failure(&self) -> bool {
        matches!(
            self,
            CoreError::PermissionDenied(_)
                | CoreError::PreconditionFailed { .. }
                | CoreError::InvalidSchedule { .. }
                | CoreError::Validation(_)
        )
    }
}
