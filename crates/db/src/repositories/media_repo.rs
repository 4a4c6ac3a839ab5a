//! Repository for the `media_items` table.

use mediahub_core::store::{MediaFilter, MediaOrder, MediaQuery, SortField};
use mediahub_core::types::{DbId, Timestamp};
use mediahub_core::visibility::PUBLIC_STATUSES;
use sqlx::PgPool;

use crate::models::media::{CreateMediaItemRow, MediaItemRow};

/// Column list for `media_items` SELECT queries.
const COLUMNS: &str = "\
    id, slug, title, summary, body, seo_title, seo_description, canonical_url, \
    language, content_type, status, visibility, published_at, \
    created_by, created_at, updated_at";

/// Provides CRUD operations for media items.
pub struct MediaRepo;

impl MediaRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MediaItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_items WHERE id = $1");
        sqlx::query_as::<_, MediaItemRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<MediaItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_items WHERE slug = $1");
        sqlx::query_as::<_, MediaItemRow>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Insert a Draft item inside an open transaction.
    pub async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateMediaItemRow,
    ) -> Result<MediaItemRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_items \
                (slug, title, summary, body, seo_title, seo_description, canonical_url, \
                 language, content_type, status, visibility, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'draft', $10, $11, $12, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaItemRow>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.body)
            .bind(&input.seo_title)
            .bind(&input.seo_description)
            .bind(&input.canonical_url)
            .bind(&input.language)
            .bind(&input.content_type)
            .bind(&input.visibility)
            .bind(input.created_by)
            .bind(input.created_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Overwrite every mutable column, but only while the persisted status
    /// still equals `expected_status`. Returns `None` when it does not.
    pub async fn update_if_status(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        row: &MediaItemRow,
        expected_status: &str,
    ) -> Result<Option<MediaItemRow>, sqlx::Error> {
        let query = format!(
            "UPDATE media_items SET \
                slug = $3, title = $4, summary = $5, body = $6, \
                seo_title = $7, seo_description = $8, canonical_url = $9, \
                language = $10, content_type = $11, status = $12, visibility = $13, \
                published_at = $14, updated_at = GREATEST($15, updated_at) \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaItemRow>(&query)
            .bind(row.id)
            .bind(expected_status)
            .bind(&row.slug)
            .bind(&row.title)
            .bind(&row.summary)
            .bind(&row.body)
            .bind(&row.seo_title)
            .bind(&row.seo_description)
            .bind(&row.canonical_url)
            .bind(&row.language)
            .bind(&row.content_type)
            .bind(&row.status)
            .bind(&row.visibility)
            .bind(row.published_at)
            .bind(row.updated_at)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Query media items with filtering, ordering and pagination.
    pub async fn query(pool: &PgPool, params: &MediaQuery) -> Result<Vec<MediaItemRow>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_media_filter(&params.filter);
        let order_clause = order_clause(params.order);

        let query = format!(
            "SELECT {COLUMNS} FROM media_items {where_clause} \
             ORDER BY {order_clause} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_media_values(sqlx::query_as::<_, MediaItemRow>(&query), &bind_values);
        q.bind(params.range.limit)
            .bind(params.range.offset)
            .fetch_all(pool)
            .await
    }

    /// Count media items matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &MediaFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_media_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM media_items {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::TextArray(v) => q.bind(v.as_slice()),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q.fetch_one(pool).await
    }
}

// ---------------------------------------------------------------------------
// Dynamic filter helpers
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built media queries.
enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    Timestamp(Timestamp),
}

/// Escape `%`, `_` and `\` so a search term matches literally under ILIKE.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Build a WHERE clause and bind values from a [`MediaFilter`].
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_media_filter(filter: &MediaFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    let mut push = |condition: &str, value: BindValue| {
        conditions.push(condition.replace("$?", &format!("${bind_idx}")));
        bind_idx += 1;
        bind_values.push(value);
    };

    if let Some(status) = filter.status {
        push("status = $?", BindValue::Text(status.name().to_string()));
    }
    if let Some(content_type) = filter.content_type {
        push("content_type = $?", BindValue::Text(content_type.name().to_string()));
    }
    if let Some(visibility) = filter.visibility {
        push("visibility = $?", BindValue::Text(visibility.name().to_string()));
    }
    if let Some(ref language) = filter.language {
        push("language = $?", BindValue::Text(language.clone()));
    }
    if let Some(ref search) = filter.search {
        push("title ILIKE $?", BindValue::Text(like_pattern(search)));
    }
    if let Some(ref key) = filter.taxonomy_key {
        push(
            "EXISTS (SELECT 1 FROM media_taxonomy mt \
                     JOIN taxonomy_terms t ON t.id = mt.term_id \
                     WHERE mt.media_id = media_items.id AND t.key = $?)",
            BindValue::Text(key.clone()),
        );
    }
    if let Some(now) = filter.public_at {
        let statuses = PUBLIC_STATUSES.iter().map(|s| s.name().to_string()).collect();
        push("status = ANY($?)", BindValue::TextArray(statuses));
        push("published_at <= $?", BindValue::Timestamp(now));
        conditions.push("visibility = 'public'".to_string());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Ascending puts missing values first, descending puts them last; `id`
/// breaks ties in the same direction.
fn order_clause(order: MediaOrder) -> String {
    let column = match order.field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::PublishedAt => "published_at",
        SortField::Title => "lower(title)",
    };
    let (direction, nulls) = if order.descending {
        ("DESC", "NULLS LAST")
    } else {
        ("ASC", "NULLS FIRST")
    };
    format!("{column} {direction} {nulls}, id {direction}")
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_media_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        q = match val {
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::TextArray(v) => q.bind(v.as_slice()),
            BindValue::Timestamp(v) => q.bind(*v),
        };
    }
    q
}
