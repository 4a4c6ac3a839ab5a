//! Row structs for each table.
//!
//! These mirror the database columns exactly (snake_case, enums as TEXT).
//! Conversion to and from `mediahub_core` types happens only in
//! [`crate::adapter`].

pub mod asset;
pub mod audit;
pub mod media;
pub mod submission;
pub mod taxonomy;
