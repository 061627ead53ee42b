//! Reservations
//!
//! Boundary validation plus the transactional write paths (public
//! submission and admin update). Reads and deletes go straight to the
//! repository.
//!
//! # 流程
//!
//! ```text
//! ReservationCreate ──validate──▶ ReservationDraft ──create_reservation──▶ ReservationDetail
//! ReservationUpdate ──validate──▶ ReservationPatch ──update_reservation──▶ ReservationDetail
//! ```

pub mod update;
pub mod validate;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    Paginated, ReservationDetail, ReservationListQuery, ReservationSort, ReservationStatus,
};
use shared::slug::tags_summary;
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, begin_write};
use crate::db::repository::reservation::{self, NewReservation, ReservationFilter};
use crate::utils::AppResult;

pub use update::{TagSync, reconcile_tags, update_reservation};
pub use validate::{ReservationDraft, ReservationPatch, parse_reservation_date};

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::ReservationNotFound,
        format!("Reservation {id} not found"),
    )
    .with_detail("id", id)
}

/// Insert a public submission (status PENDING) and link its tags atomically
pub async fn create_reservation(
    pool: &SqlitePool,
    draft: ReservationDraft,
) -> AppResult<ReservationDetail> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let summary = tags_summary(&draft.tags);

    let mut tx = begin_write(pool).await?;
    reservation::insert(
        &mut tx,
        &NewReservation {
            id,
            name: &draft.name,
            phone: &draft.phone,
            email: &draft.email,
            date: draft.date,
            time: &draft.time,
            guests: draft.guests,
            notes: draft.notes.as_deref(),
            tags_summary: &summary,
            now,
        },
    )
    .await?;
    update::link_requested(&mut tx, id, &draft.tags, now).await?;

    let detail = reservation::find_detail(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        reservation_id = id,
        date = %draft.date,
        guests = draft.guests,
        tags = draft.tags.len(),
        "Reservation submitted"
    );
    Ok(detail)
}

pub async fn get_reservation(pool: &SqlitePool, id: i64) -> AppResult<ReservationDetail> {
    let mut conn = pool.acquire().await.map_err(RepoError::from)?;
    reservation::find_detail(&mut conn, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Admin list: filter, sort and paginate
pub async fn list_reservations(
    pool: &SqlitePool,
    query: ReservationListQuery,
) -> AppResult<Paginated<ReservationDetail>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let filter = ReservationFilter {
        search: query
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty()),
        // Unknown status values are ignored rather than rejected
        status: query.status.as_deref().and_then(ReservationStatus::parse),
        tag: query
            .tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        sort: query
            .sort
            .as_deref()
            .map(ReservationSort::parse)
            .unwrap_or_default(),
        limit: page_size,
        offset: u64::from(page - 1) * u64::from(page_size),
    };

    let (items, total) = reservation::list(pool, &filter).await?;
    Ok(Paginated::new(items, total, page, page_size))
}

pub async fn delete_reservation(pool: &SqlitePool, id: i64) -> AppResult<()> {
    if !reservation::delete(pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(reservation_id = id, "Reservation deleted");
    Ok(())
}

#[cfg(test)]
mod tests;
