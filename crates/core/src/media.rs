//! Media item data model, submissions, and content-field validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{define_text_enum, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

define_text_enum! {
    /// Publication lifecycle status.
    MediaStatus {
        Draft = "draft",
        InReview = "in_review",
        Scheduled = "scheduled",
        Published = "published",
        Archived = "archived",
    }
}

define_text_enum! {
    Visibility {
        Public = "public",
        Private = "private",
    }
}

define_text_enum! {
    /// Kind of content a media item carries.
    ContentType {
        Article = "article",
        Report = "report",
        Announcement = "announcement",
        Event = "event",
        Podcast = "podcast",
        Video = "video",
        Image = "image",
    }
}

define_text_enum! {
    /// Review request state. Resolved exactly once.
    SubmissionState {
        Submitted = "submitted",
        Approved = "approved",
        Rejected = "rejected",
    }
}

impl MediaStatus {
    /// Statuses that require a non-null `published_at`.
    pub fn requires_publish_time(self) -> bool {
        matches!(self, MediaStatus::Scheduled | MediaStatus::Published)
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical_url: Option<String>,
}

/// A publishable content record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub seo: SeoMeta,
    pub language: String,
    pub content_type: ContentType,
    pub status: MediaStatus,
    pub visibility: Visibility,
    pub published_at: Option<Timestamp>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review request for one review cycle of a media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: DbId,
    pub media_id: DbId,
    pub state: SubmissionState,
    pub submitted_by: DbId,
    pub reviewer_id: Option<DbId>,
    pub created_at: Timestamp,
    pub decided_at: Option<Timestamp>,
}

impl Submission {
    /// Ordering key for "latest": creation time, then id.
    pub fn recency_key(&self) -> (Timestamp, DbId) {
        (self.created_at, self.id)
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

fn default_language() -> String {
    "en".to_string()
}

fn default_visibility() -> Visibility {
    Visibility::Public
}

/// Input for creating a media item. Items are always created in Draft.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMediaItem {
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub seo: SeoMeta,
    #[serde(default = "default_language")]
    pub language: String,
    pub content_type: ContentType,
    #[serde(default = "default_visibility")]
    pub visibility: Visibility,
}

impl NewMediaItem {
    /// Validate fields and resolve the slug.
    pub fn validate(&self) -> Result<String, CoreError> {
        validate_title(&self.title)?;
        validate_language(&self.language)?;
        if let Some(url) = &self.seo.canonical_url {
            validate_canonical_url(url)?;
        }
        let slug = match &self.slug {
            Some(slug) => slug.clone(),
            None => slugify(&self.title),
        };
        validate_slug(&slug)?;
        Ok(slug)
    }
}

/// Partial content update. `None` leaves a field untouched.
///
/// For the optional text fields, `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaUpdate {
    pub slug: Option<String>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub body: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub seo_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub seo_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub canonical_url: Option<Option<String>>,
    pub language: Option<String>,
    pub content_type: Option<ContentType>,
    pub visibility: Option<Visibility>,
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl MediaUpdate {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(language) = &self.language {
            validate_language(language)?;
        }
        if let Some(Some(url)) = &self.canonical_url {
            validate_canonical_url(url)?;
        }
        Ok(())
    }

    /// `item` with this update's content fields applied.
    pub fn apply(self, item: &MediaItem) -> MediaItem {
        let mut next = item.clone();
        if let Some(slug) = self.slug {
            next.slug = slug;
        }
        if let Some(title) = self.title {
            next.title = title.trim().to_string();
        }
        if let Some(summary) = self.summary {
            next.summary = summary;
        }
        if let Some(body) = self.body {
            next.body = body;
        }
        if let Some(title) = self.seo_title {
            next.seo.title = title;
        }
        if let Some(description) = self.seo_description {
            next.seo.description = description;
        }
        if let Some(url) = self.canonical_url {
            next.seo.canonical_url = url;
        }
        if let Some(language) = self.language {
            next.language = language;
        }
        if let Some(content_type) = self.content_type {
            next.content_type = content_type;
        }
        if let Some(visibility) = self.visibility {
            next.visibility = visibility;
        }
        next
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub const MAX_SLUG_LEN: usize = 120;
pub const MAX_TITLE_LEN: usize = 300;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

static LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(?:-[A-Za-z0-9]{2,8})*$").expect("valid language regex")
});

pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be between 1 and {MAX_SLUG_LEN} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits, and single hyphens"
        )));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_language(tag: &str) -> Result<(), CoreError> {
    if LANGUAGE_RE.is_match(tag) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid language tag '{tag}'")))
    }
}

pub fn validate_canonical_url(url: &str) -> Result<(), CoreError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Canonical URL '{url}' must be an absolute http(s) URL"
        )))
    }
}

/// Lowercase, ASCII-only, hyphen-separated form of `text`.
///
/// Non-ASCII characters and punctuation become separators; the result is
/// truncated to [`MAX_SLUG_LEN`].
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}
