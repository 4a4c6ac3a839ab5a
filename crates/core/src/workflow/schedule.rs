//! Publish-time resolution and the strictly-future rule.

use chrono::{NaiveDate, NaiveTime, TimeZone};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Combine a calendar date and optional clock time (midnight by default)
/// in `tz` into a UTC instant.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant;
/// non-existent local times (DST spring-forward gap) are rejected.
pub fn resolve_publish_at<Tz: TimeZone>(
    date: NaiveDate,
    time: Option<NaiveTime>,
    tz: &Tz,
) -> Result<Timestamp, CoreError> {
    let naive = date.and_time(time.unwrap_or(NaiveTime::MIN));
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&chrono::Utc))
        .ok_or_else(|| {
            CoreError::Validation(format!("{naive} does not exist in the requested time zone"))
        })
}

/// The publish instant must be strictly after `now`.
pub fn ensure_future(requested: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if requested > now {
        Ok(())
    } else {
        Err(CoreError::InvalidSchedule { requested, now })
    }
}
