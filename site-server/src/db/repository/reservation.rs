//! Reservation Repository
//!
//! Reads over the pool, plus the transaction-scoped write steps used by
//! [`crate::reservations`].

use std::collections::HashMap;

use chrono::NaiveDate;
use shared::models::{AreaTagRef, Reservation, ReservationDetail, ReservationSort, ReservationStatus};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool, Transaction};

use super::RepoResult;

const COLUMNS: &str = "id, name, phone, email, date, time, guests, notes, status, tags_summary, created_at, updated_at";

/// New reservation row
#[derive(Debug, Clone)]
pub struct NewReservation<'a> {
    pub id: i64,
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub date: NaiveDate,
    pub time: &'a str,
    pub guests: i32,
    pub notes: Option<&'a str>,
    pub tags_summary: &'a str,
    pub now: i64,
}

/// Column changes for a partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ReservationChanges<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub date: Option<NaiveDate>,
    pub time: Option<&'a str>,
    pub guests: Option<i32>,
    pub notes: Option<&'a str>,
    pub status: Option<ReservationStatus>,
    pub tags_summary: Option<&'a str>,
}

/// Current link of a reservation to an area tag
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LinkedTag {
    pub area_tag_id: i64,
    pub slug: String,
}

/// Admin list filter (already validated / clamped)
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    /// Lowercased substring over name / email / phone / notes
    pub search: Option<String>,
    pub status: Option<ReservationStatus>,
    /// Area tag slug
    pub tag: Option<String>,
    pub sort: ReservationSort,
    pub limit: u32,
    pub offset: u64,
}

#[derive(sqlx::FromRow)]
struct ReservationTagRow {
    reservation_id: i64,
    id: i64,
    name: String,
    slug: String,
}

// ── Reads ────────────────────────────────────────────────────────

pub async fn exists<'e, E>(executor: E, id: i64) -> RepoResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM reservation WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Reservation>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLUMNS} FROM reservation WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Resolved tags of one reservation, ordered by name
pub async fn find_area_tags<'e, E>(executor: E, reservation_id: i64) -> RepoResult<Vec<AreaTagRef>>
where
    E: SqliteExecutor<'e>,
{
    let tags = sqlx::query_as::<_, AreaTagRef>(
        "SELECT t.id, t.name, t.slug FROM reservation_area_tag rat JOIN area_tag t ON t.id = rat.area_tag_id WHERE rat.reservation_id = ? ORDER BY t.name",
    )
    .bind(reservation_id)
    .fetch_all(executor)
    .await?;
    Ok(tags)
}

/// Reservation plus its resolved tags, read through one connection
pub async fn find_detail(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<ReservationDetail>> {
    let Some(reservation) = find_by_id(&mut *conn, id).await? else {
        return Ok(None);
    };
    let area_tags = find_area_tags(&mut *conn, id).await?;
    Ok(Some(ReservationDetail {
        reservation,
        area_tags,
    }))
}

/// One page of reservations matching `filter`, plus the total match count
pub async fn list(
    pool: &SqlitePool,
    filter: &ReservationFilter,
) -> RepoResult<(Vec<ReservationDetail>, u64)> {
    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM reservation r");
    push_filters(&mut count_query, filter);
    let total: i64 = count_query
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let mut page_query = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {} FROM reservation r",
        COLUMNS
            .split(", ")
            .map(|c| format!("r.{c}"))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    push_filters(&mut page_query, filter);
    page_query.push(match filter.sort {
        ReservationSort::DateDesc => " ORDER BY r.date DESC, r.created_at DESC",
        ReservationSort::DateAsc => " ORDER BY r.date ASC, r.created_at ASC",
        ReservationSort::CreatedDesc => " ORDER BY r.created_at DESC",
    });
    page_query.push(", r.id DESC LIMIT ");
    page_query.push_bind(i64::from(filter.limit));
    page_query.push(" OFFSET ");
    page_query.push_bind(filter.offset as i64);

    let reservations = page_query
        .build_query_as::<Reservation>()
        .fetch_all(pool)
        .await?;
    let ids: Vec<i64> = reservations.iter().map(|r| r.id).collect();
    let mut tags_by_reservation = find_area_tags_for(pool, &ids).await?;

    let details = reservations
        .into_iter()
        .map(|reservation| {
            let area_tags = tags_by_reservation
                .remove(&reservation.id)
                .unwrap_or_default();
            ReservationDetail {
                reservation,
                area_tags,
            }
        })
        .collect();

    Ok((details, total.max(0) as u64))
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &ReservationFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(search) = filter.search.as_deref() {
        let pattern = format!("%{}%", escape_like(search));
        query.push(" AND (LOWER(r.name) LIKE ");
        query.push_bind(pattern.clone());
        query.push(" ESCAPE '\\' OR LOWER(r.email) LIKE ");
        query.push_bind(pattern.clone());
        query.push(" ESCAPE '\\' OR LOWER(r.phone) LIKE ");
        query.push_bind(pattern.clone());
        query.push(" ESCAPE '\\' OR LOWER(COALESCE(r.notes, '')) LIKE ");
        query.push_bind(pattern);
        query.push(" ESCAPE '\\')");
    }

    if let Some(status) = filter.status {
        query.push(" AND r.status = ");
        query.push_bind(status.as_str());
    }

    if let Some(tag) = filter.tag.as_deref() {
        query.push(
            " AND EXISTS (SELECT 1 FROM reservation_area_tag rat JOIN area_tag t ON t.id = rat.area_tag_id WHERE rat.reservation_id = r.id AND t.slug = ",
        );
        query.push_bind(tag.to_string());
        query.push(")");
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

async fn find_area_tags_for(
    pool: &SqlitePool,
    reservation_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<AreaTagRef>>> {
    let mut by_reservation: HashMap<i64, Vec<AreaTagRef>> = HashMap::new();
    if reservation_ids.is_empty() {
        return Ok(by_reservation);
    }

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT rat.reservation_id, t.id, t.name, t.slug FROM reservation_area_tag rat JOIN area_tag t ON t.id = rat.area_tag_id WHERE rat.reservation_id IN (",
    );
    let mut separated = query.separated(", ");
    for id in reservation_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY t.name");

    let rows = query
        .build_query_as::<ReservationTagRow>()
        .fetch_all(pool)
        .await?;
    for row in rows {
        by_reservation
            .entry(row.reservation_id)
            .or_default()
            .push(AreaTagRef {
                id: row.id,
                name: row.name,
                slug: row.slug,
            });
    }
    Ok(by_reservation)
}

// ── Writes ───────────────────────────────────────────────────────

pub async fn insert(tx: &mut Transaction<'_, Sqlite>, row: &NewReservation<'_>) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO reservation (id, name, phone, email, date, time, guests, notes, status, tags_summary, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(row.id)
    .bind(row.name)
    .bind(row.phone)
    .bind(row.email)
    .bind(row.date)
    .bind(row.time)
    .bind(row.guests)
    .bind(row.notes)
    .bind(ReservationStatus::Pending)
    .bind(row.tags_summary)
    .bind(row.now)
    .bind(row.now)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Apply column changes and bump `updated_at`. Returns false if the row is gone.
pub async fn apply_changes(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    changes: &ReservationChanges<'_>,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE reservation SET name = COALESCE(?, name), phone = COALESCE(?, phone), email = COALESCE(?, email), date = COALESCE(?, date), time = COALESCE(?, time), guests = COALESCE(?, guests), notes = COALESCE(?, notes), status = COALESCE(?, status), tags_summary = COALESCE(?, tags_summary), updated_at = ? WHERE id = ?",
    )
    .bind(changes.name)
    .bind(changes.phone)
    .bind(changes.email)
    .bind(changes.date)
    .bind(changes.time)
    .bind(changes.guests)
    .bind(changes.notes)
    .bind(changes.status)
    .bind(changes.tags_summary)
    .bind(now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Current links with their tag slugs
pub async fn find_links(
    tx: &mut Transaction<'_, Sqlite>,
    reservation_id: i64,
) -> RepoResult<Vec<LinkedTag>> {
    let links = sqlx::query_as::<_, LinkedTag>(
        "SELECT rat.area_tag_id, t.slug FROM reservation_area_tag rat JOIN area_tag t ON t.id = rat.area_tag_id WHERE rat.reservation_id = ?",
    )
    .bind(reservation_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(links)
}

/// Delete the given links in one statement. Returns the number removed.
pub async fn unlink(
    tx: &mut Transaction<'_, Sqlite>,
    reservation_id: i64,
    area_tag_ids: &[i64],
) -> RepoResult<u64> {
    if area_tag_ids.is_empty() {
        return Ok(0);
    }

    let mut query = QueryBuilder::<Sqlite>::new(
        "DELETE FROM reservation_area_tag WHERE reservation_id = ",
    );
    query.push_bind(reservation_id);
    query.push(" AND area_tag_id IN (");
    let mut separated = query.separated(", ");
    for id in area_tag_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let rows = query.build().execute(&mut **tx).await?;
    Ok(rows.rows_affected())
}

/// Link a tag; linking twice is a no-op
pub async fn link(
    tx: &mut Transaction<'_, Sqlite>,
    reservation_id: i64,
    area_tag_id: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO reservation_area_tag (reservation_id, area_tag_id) VALUES (?, ?) ON CONFLICT DO NOTHING",
    )
    .bind(reservation_id)
    .bind(area_tag_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM reservation WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("ana"), "ana");
    }
}
