//! Unauthenticated endpoints for the public knowledge-hub site.
//!
//! Visibility is decided at request time against the engine's clock; a
//! Scheduled item appears once its publish time has passed.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use mediahub_core::asset::{Asset, AssetKind};
use mediahub_core::media::{ContentType, MediaItem, SeoMeta};
use mediahub_core::taxonomy::TaxonomyTerm;
use mediahub_core::types::{DbId, Timestamp};
use mediahub_core::visibility::is_publicly_visible;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::PublicMediaParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Public projection of a media item. Workflow fields are omitted.
#[derive(Debug, Serialize)]
pub struct PublicMedia {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub seo: SeoMeta,
    pub language: String,
    pub content_type: ContentType,
    pub published_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl From<MediaItem> for PublicMedia {
    fn from(item: MediaItem) -> Self {
        Self {
            id: item.id,
            slug: item.slug,
            title: item.title,
            summary: item.summary,
            body: item.body,
            seo: item.seo,
            language: item.language,
            content_type: item.content_type,
            published_at: item.published_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicAsset {
    pub url: String,
    pub mime_type: String,
    pub kind: AssetKind,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl From<Asset> for PublicAsset {
    fn from(asset: Asset) -> Self {
        Self {
            url: asset.public_url,
            mime_type: asset.mime_type,
            kind: asset.kind,
            width: asset.width,
            height: asset.height,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicMediaDetail {
    #[serde(flatten)]
    pub media: PublicMedia,
    pub assets: Vec<PublicAsset>,
    pub terms: Vec<TaxonomyTerm>,
}

/// GET /api/v1/public/media
pub async fn list_public_media(
    State(state): State<AppState>,
    Query(params): Query<PublicMediaParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.into_query(state.engine.now());
    let page = state.store.query_media(&query).await?;
    Ok(Json(PageResponse {
        data: page.items.into_iter().map(PublicMedia::from).collect(),
        total: page.total,
    }))
}

/// GET /api/v1/public/media/{slug}
///
/// Hidden items are indistinguishable from missing ones.
pub async fn get_public_media(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let now = state.engine.now();
    let item = state
        .store
        .get_media_by_slug(&slug)
        .await?
        .filter(|item| is_publicly_visible(item, now))
        .ok_or_else(|| AppError::NotFound(format!("No published media item with slug '{slug}'")))?;

    let assets = state.store.list_assets(item.id).await?;
    let terms = state.store.terms_for_media(item.id).await?;

    Ok(Json(DataResponse {
        data: PublicMediaDetail {
            media: PublicMedia::from(item),
            assets: assets.into_iter().map(PublicAsset::from).collect(),
            terms,
        },
    }))
}
