//! Domain core for the mediahub content platform.
//!
//! Holds the media data model, the publication workflow engine, audit diffs,
//! the public visibility gate, and the store / object-storage contracts that
//! the `db` and `api` crates implement and consume.

pub mod asset;
pub mod audit;
pub mod clock;
pub mod error;
pub mod media;
pub mod roles;
pub mod store;
pub mod taxonomy;
pub mod types;
pub mod visibility;
pub mod workflow;
