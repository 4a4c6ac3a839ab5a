//! Read-time gate deciding what the public site may display.
//!
//! There is no background job promoting Scheduled items. A Scheduled item
//! becomes visible purely because `published_at` has passed at query time.

use crate::media::{MediaItem, MediaStatus, Visibility};
use crate::types::Timestamp;

/// Statuses the public site may show once their publish time has passed.
pub const PUBLIC_STATUSES: &[MediaStatus] = &[MediaStatus::Scheduled, MediaStatus::Published];

/// Whether `item` is eligible for public listing at `now`.
pub fn is_publicly_visible(item: &MediaItem, now: Timestamp) -> bool {
    PUBLIC_STATUSES.contains(&item.status)
        && item.visibility == Visibility::Public
        && item.published_at.is_some_and(|at| at <= now)
}
