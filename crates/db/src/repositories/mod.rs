//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open transaction) as the first argument and
//! return row structs from [`crate::models`].

pub mod asset_repo;
pub mod audit_repo;
pub mod media_repo;
pub mod submission_repo;
pub mod taxonomy_repo;

pub use asset_repo::AssetRepo;
pub use audit_repo::AuditLogRepo;
pub use media_repo::MediaRepo;
pub use submission_repo::SubmissionRepo;
pub use taxonomy_repo::TaxonomyRepo;
