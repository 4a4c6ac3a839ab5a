//! Shared query parameter types for API handlers.

use mediahub_core::media::{ContentType, MediaStatus, Visibility};
use mediahub_core::store::{MediaFilter, MediaOrder, MediaQuery, PageRange, SortField};
use mediahub_core::types::Timestamp;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Clamped by [`PageRange::clamp`].
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn range(&self) -> PageRange {
        PageRange::clamp(self.limit, self.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Admin listing: `GET /media?status=&content_type=&visibility=&language=&q=
/// &taxonomy=&sort=&order=&limit=&offset=`.
#[derive(Debug, Default, Deserialize)]
pub struct MediaListParams {
    pub status: Option<MediaStatus>,
    pub content_type: Option<ContentType>,
    pub visibility: Option<Visibility>,
    pub language: Option<String>,
    pub q: Option<String>,
    pub taxonomy: Option<String>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl MediaListParams {
    /// Without an explicit `order`, titles sort ascending and timestamps
    /// newest first.
    pub fn into_query(self) -> MediaQuery {
        let field = self.sort.unwrap_or_default();
        let descending = match self.order {
            Some(order) => order == SortOrder::Desc,
            None => field != SortField::Title,
        };
        MediaQuery {
            filter: MediaFilter {
                status: self.status,
                content_type: self.content_type,
                visibility: self.visibility,
                language: self.language,
                search: non_blank(self.q),
                taxonomy_key: non_blank(self.taxonomy),
                public_at: None,
            },
            order: MediaOrder { field, descending },
            range: PageRange::clamp(self.limit, self.offset),
        }
    }
}

/// Public listing: `GET /public/media?content_type=&language=&q=&taxonomy=
/// &limit=&offset=`. Always newest publication first.
#[derive(Debug, Default, Deserialize)]
pub struct PublicMediaParams {
    pub content_type: Option<ContentType>,
    pub language: Option<String>,
    pub q: Option<String>,
    pub taxonomy: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PublicMediaParams {
    pub fn into_query(self, now: Timestamp) -> MediaQuery {
        let mut query = MediaQuery::public(now);
        query.filter.content_type = self.content_type;
        query.filter.language = self.language;
        query.filter.search = non_blank(self.q);
        query.filter.taxonomy_key = non_blank(self.taxonomy);
        query.range = PageRange::clamp(self.limit, self.offset);
        query
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn admin_defaults_to_recently_updated() {
        let query = MediaListParams::default().into_query();
        assert_eq!(query.order, MediaOrder::default());
        assert_eq!(query.range, PageRange::default());
        assert_eq!(query.filter, MediaFilter::default());
    }

    #[test]
    fn title_sort_defaults_to_ascending() {
        let query = MediaListParams {
            sort: Some(SortField::Title),
            ..Default::default()
        }
        .into_query();
        assert!(!query.order.descending);
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = MediaListParams {
            q: Some("   ".into()),
            taxonomy: Some(" payroll ".into()),
            ..Default::default()
        }
        .into_query();
        assert_eq!(query.filter.search, None);
        assert_eq!(query.filter.taxonomy_key.as_deref(), Some("payroll"));
    }

    #[test]
    fn public_query_always_applies_gate() {
        let now = Utc::now();
        let query = PublicMediaParams {
            language: Some("fr".into()),
            ..Default::default()
        }
        .into_query(now);
        assert_eq!(query.filter.public_at, Some(now));
        assert_eq!(query.filter.language.as_deref(), Some("fr"));
        assert_eq!(query.order.field, SortField::PublishedAt);
    }
}
