//! Reservation update transaction
//!
//! Applies a checked [`ReservationPatch`] and, when a tag list is supplied,
//! reconciles the reservation's area-tag links to exactly that list. Every
//! write of one call happens inside a single SQLite transaction; returning
//! early drops the transaction, which rolls it back.

use shared::models::ReservationDetail;
use shared::slug::{RequestedTag, tags_summary};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::{ReservationPatch, not_found};
use crate::db::repository::area_tag::{self, TagUpsert};
use crate::db::repository::reservation::{self, ReservationChanges};
use crate::db::repository::{RepoError, RepoResult, begin_write};
use crate::utils::AppResult;

/// What a tag reconciliation changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSync {
    /// Links removed because their slug is no longer requested
    pub removed: u64,
    /// Slugs of area tags that did not exist before this call
    pub created: Vec<String>,
}

pub async fn update_reservation(
    pool: &SqlitePool,
    id: i64,
    patch: ReservationPatch,
) -> AppResult<ReservationDetail> {
    let now = shared::util::now_millis();
    let mut tx = begin_write(pool).await?;

    if !reservation::exists(&mut *tx, id).await? {
        return Err(not_found(id));
    }

    let summary = match patch.tags.as_deref() {
        Some(tags) => {
            let sync = reconcile_tags(&mut tx, id, tags, now).await?;
            tracing::debug!(
                reservation_id = id,
                requested = tags.len(),
                removed = sync.removed,
                created = ?sync.created,
                "Area tags reconciled"
            );
            Some(tags_summary(tags))
        }
        None => None,
    };

    let changes = ReservationChanges {
        name: patch.name.as_deref(),
        phone: patch.phone.as_deref(),
        email: patch.email.as_deref(),
        date: patch.date,
        time: patch.time.as_deref(),
        guests: patch.guests,
        notes: patch.notes.as_deref(),
        status: patch.status,
        tags_summary: summary.as_deref(),
    };
    if !reservation::apply_changes(&mut tx, id, &changes, now).await? {
        return Err(not_found(id));
    }

    let detail = reservation::find_detail(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        reservation_id = id,
        status = detail.reservation.status.as_str(),
        "Reservation updated"
    );
    Ok(detail)
}

/// Make the reservation's links match `tags` exactly.
///
/// Stale links are removed in one statement; every requested tag is then
/// found-or-created by slug and linked (linking is idempotent).
pub async fn reconcile_tags(
    tx: &mut Transaction<'_, Sqlite>,
    reservation_id: i64,
    tags: &[RequestedTag],
    now: i64,
) -> RepoResult<TagSync> {
    let current = reservation::find_links(tx, reservation_id).await?;
    let stale: Vec<i64> = current
        .iter()
        .filter(|link| !tags.iter().any(|t| t.slug == link.slug))
        .map(|link| link.area_tag_id)
        .collect();

    let removed = reservation::unlink(tx, reservation_id, &stale).await?;
    let created = link_requested(tx, reservation_id, tags, now).await?;
    Ok(TagSync { removed, created })
}

/// Ensure and link each requested tag. Returns the slugs that were created.
pub(super) async fn link_requested(
    tx: &mut Transaction<'_, Sqlite>,
    reservation_id: i64,
    tags: &[RequestedTag],
    now: i64,
) -> RepoResult<Vec<String>> {
    let mut created = Vec::new();
    for tag in tags {
        let upsert = area_tag::ensure(tx, tag, now).await?;
        if let TagUpsert::Created(tag_id) = upsert {
            tracing::info!(area_tag_id = tag_id, slug = %tag.slug, "Area tag created");
            created.push(tag.slug.clone());
        }
        reservation::link(tx, reservation_id, upsert.id()).await?;
    }
    Ok(created)
}
