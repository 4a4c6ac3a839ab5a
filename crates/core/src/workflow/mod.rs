//! Publication workflow: the transition table, schedule rules, and the
//! engine that applies guarded transitions through a [`MediaStore`].
//!
//! [`MediaStore`]: crate::store::MediaStore

pub mod engine;
pub mod schedule;
pub mod transition;

pub use engine::WorkflowEngine;
pub use schedule::{ensure_future, resolve_publish_at};
pub use transition::{authorize, check_source, RoleGrant, Transition};
