//! Area Tag Repository

use super::{RepoError, RepoResult, begin_write};
use shared::models::{AreaTag, AreaTagCreate, AreaTagUpdate};
use shared::slug::{RequestedTag, normalize};
use sqlx::{Sqlite, SqliteExecutor, SqlitePool, Transaction};

const COLUMNS: &str = "id, name, slug, description, is_active, created_at, updated_at";

/// Outcome of [`ensure`]: the tag already existed, or was inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagUpsert {
    Found(i64),
    Created(i64),
}

impl TagUpsert {
    pub fn id(&self) -> i64 {
        match self {
            TagUpsert::Found(id) | TagUpsert::Created(id) => *id,
        }
    }
}

pub async fn find_all(pool: &SqlitePool, include_inactive: bool) -> RepoResult<Vec<AreaTag>> {
    let sql = if include_inactive {
        format!("SELECT {COLUMNS} FROM area_tag ORDER BY name")
    } else {
        format!("SELECT {COLUMNS} FROM area_tag WHERE is_active = 1 ORDER BY name")
    };
    let tags = sqlx::query_as::<_, AreaTag>(&sql).fetch_all(pool).await?;
    Ok(tags)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<AreaTag>>
where
    E: SqliteExecutor<'e>,
{
    let tag = sqlx::query_as::<_, AreaTag>(&format!("SELECT {COLUMNS} FROM area_tag WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(tag)
}

pub async fn find_by_slug<'e, E>(executor: E, slug: &str) -> RepoResult<Option<AreaTag>>
where
    E: SqliteExecutor<'e>,
{
    let tag =
        sqlx::query_as::<_, AreaTag>(&format!("SELECT {COLUMNS} FROM area_tag WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(executor)
            .await?;
    Ok(tag)
}

/// Create a tag; `slug` defaults to the normalized name
pub async fn create(pool: &SqlitePool, data: AreaTagCreate) -> RepoResult<AreaTag> {
    let now = shared::util::now_millis();
    let slug = data.slug.unwrap_or_else(|| normalize(&data.name));
    let is_active = data.is_active.unwrap_or(true);

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO area_tag (name, slug, description, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&slug)
    .bind(&data.description)
    .bind(is_active)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| slug_conflict(e, &slug))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create area tag".into()))
}

/// Partial update addressed by current slug
pub async fn update(pool: &SqlitePool, slug: &str, data: AreaTagUpdate) -> RepoResult<AreaTag> {
    let now = shared::util::now_millis();
    let mut tx = begin_write(pool).await?;

    let existing = find_by_slug(&mut *tx, slug)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Area tag '{slug}' not found")))?;

    if let Some(new_slug) = data.slug.as_deref()
        && new_slug != existing.slug
    {
        let taken = sqlx::query_scalar::<_, i64>("SELECT id FROM area_tag WHERE slug = ? AND id <> ?")
            .bind(new_slug)
            .bind(existing.id)
            .fetch_optional(&mut *tx)
            .await?;
        if taken.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Slug '{new_slug}' is already in use"
            )));
        }
    }

    sqlx::query(
        "UPDATE area_tag SET name = COALESCE(?, name), slug = COALESCE(?, slug), description = COALESCE(?, description), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(now)
    .bind(existing.id)
    .execute(&mut *tx)
    .await
    .map_err(|e| slug_conflict(e, data.slug.as_deref().unwrap_or(slug)))?;

    let updated = find_by_id(&mut *tx, existing.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Area tag '{slug}' not found")))?;
    tx.commit().await?;
    Ok(updated)
}

/// Hard delete; reservation links go with it (ON DELETE CASCADE)
pub async fn delete(pool: &SqlitePool, slug: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM area_tag WHERE slug = ?")
        .bind(slug)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Insert a tag unless its slug exists. Returns whether a row was inserted.
pub async fn insert_if_missing(pool: &SqlitePool, name: &str, slug: &str) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "INSERT INTO area_tag (name, slug, is_active, created_at, updated_at) VALUES (?, ?, 1, ?, ?) ON CONFLICT(slug) DO NOTHING",
    )
    .bind(name)
    .bind(slug)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Find the tag by slug or create it, inside the caller's transaction.
///
/// An existing tag takes the requested spelling as its display name.
pub async fn ensure(
    tx: &mut Transaction<'_, Sqlite>,
    tag: &RequestedTag,
    now: i64,
) -> RepoResult<TagUpsert> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM area_tag WHERE slug = ?")
        .bind(&tag.slug)
        .fetch_optional(&mut **tx)
        .await?;

    if let Some(id) = existing {
        sqlx::query("UPDATE area_tag SET name = ?, updated_at = ? WHERE id = ? AND name <> ?")
            .bind(&tag.name)
            .bind(now)
            .bind(id)
            .bind(&tag.name)
            .execute(&mut **tx)
            .await?;
        return Ok(TagUpsert::Found(id));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO area_tag (name, slug, is_active, created_at, updated_at) VALUES (?, ?, 1, ?, ?) RETURNING id",
    )
    .bind(&tag.name)
    .bind(&tag.slug)
    .bind(now)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(TagUpsert::Created(id))
}

fn slug_conflict(err: sqlx::Error, slug: &str) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Slug '{slug}' is already in use")),
        other => other,
    }
}
