use super::*;
use crate::db::DbService;
use crate::db::repository::area_tag;
use shared::models::{AreaTagCreate, ReservationCreate};
use shared::slug::dedupe_tag_names;

async fn setup() -> SqlitePool {
    DbService::in_memory().await.unwrap().pool
}

fn draft(name: &str, date: &str, tags: &[&str]) -> ReservationDraft {
    ReservationDraft::validate(ReservationCreate {
        name: name.to_string(),
        phone: "340-555-0100".to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        date: date.to_string(),
        time: "19:30".to_string(),
        guests: 4,
        notes: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    })
    .unwrap()
}

fn tags_patch(names: &[&str]) -> ReservationPatch {
    ReservationPatch {
        tags: Some(dedupe_tag_names(names).unwrap()),
        ..Default::default()
    }
}

fn slugs(detail: &ReservationDetail) -> Vec<&str> {
    let mut slugs: Vec<&str> = detail.area_tags.iter().map(|t| t.slug.as_str()).collect();
    slugs.sort();
    slugs
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ========================================================================
// Create
// ========================================================================

#[tokio::test]
async fn test_create_reservation_links_deduplicated_tags() {
    let pool = setup().await;
    let detail = create_reservation(&pool, draft("Ana", "2025-03-14", &["VIP", "vip", "  VIP "]))
        .await
        .unwrap();

    assert_eq!(detail.reservation.status, ReservationStatus::Pending);
    assert_eq!(detail.reservation.tags_summary, "VIP");
    assert_eq!(slugs(&detail), vec!["vip"]);
    assert_eq!(count(&pool, "reservation_area_tag").await, 1);
    assert_eq!(count(&pool, "area_tag").await, 1);
}

#[tokio::test]
async fn test_create_reuses_existing_tags() {
    let pool = setup().await;
    area_tag::insert_if_missing(&pool, "Downtown", "downtown")
        .await
        .unwrap();

    let detail = create_reservation(&pool, draft("Ana", "2025-03-14", &["downtown", "Catering"]))
        .await
        .unwrap();

    assert_eq!(slugs(&detail), vec!["catering", "downtown"]);
    assert_eq!(detail.reservation.tags_summary, "downtown, Catering");
    assert_eq!(count(&pool, "area_tag").await, 2);
}

// ========================================================================
// Update transaction
// ========================================================================

#[tokio::test]
async fn test_replace_tags() {
    let pool = setup().await;
    let created = create_reservation(&pool, draft("Ana", "2025-03-14", &["Catering", "Delivery"]))
        .await
        .unwrap();
    let id = created.reservation.id;

    let updated = update_reservation(&pool, id, tags_patch(&["Delivery", "Takeout"]))
        .await
        .unwrap();

    assert_eq!(slugs(&updated), vec!["delivery", "takeout"]);
    assert_eq!(updated.reservation.tags_summary, "Delivery, Takeout");
    // The tag itself survives, only the link is gone
    assert!(area_tag::find_by_slug(&pool, "catering")
        .await
        .unwrap()
        .is_some());

    let reloaded = get_reservation(&pool, id).await.unwrap();
    assert_eq!(reloaded, updated);
}

#[tokio::test]
async fn test_status_only_update_keeps_tags() {
    let pool = setup().await;
    let created = create_reservation(&pool, draft("Ana", "2025-03-14", &["Catering", "Delivery"]))
        .await
        .unwrap();
    let id = created.reservation.id;

    let updated = update_reservation(
        &pool,
        id,
        ReservationPatch {
            status: Some(ReservationStatus::Confirmed),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.reservation.status, ReservationStatus::Confirmed);
    assert_eq!(updated.reservation.tags_summary, "Catering, Delivery");
    assert_eq!(updated.area_tags, created.area_tags);
    assert_eq!(updated.reservation.name, "Ana");
    assert!(updated.reservation.updated_at >= created.reservation.updated_at);
}

#[tokio::test]
async fn test_any_status_transition_is_allowed() {
    let pool = setup().await;
    let id = create_reservation(&pool, draft("Ana", "2025-03-14", &[]))
        .await
        .unwrap()
        .reservation
        .id;

    for status in [
        ReservationStatus::Cancelled,
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
    ] {
        let updated = update_reservation(
            &pool,
            id,
            ReservationPatch {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.reservation.status, status);
    }
}

#[tokio::test]
async fn test_partial_field_update() {
    let pool = setup().await;
    let created = create_reservation(&pool, draft("Ana", "2025-03-14", &["VIP"]))
        .await
        .unwrap();

    let updated = update_reservation(
        &pool,
        created.reservation.id,
        ReservationPatch {
            guests: Some(8),
            date: Some(parse_reservation_date("2025-04-01").unwrap()),
            notes: Some("Birthday".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.reservation.guests, 8);
    assert_eq!(updated.reservation.date.to_string(), "2025-04-01");
    assert_eq!(updated.reservation.notes.as_deref(), Some("Birthday"));
    assert_eq!(updated.reservation.phone, created.reservation.phone);
    assert_eq!(updated.reservation.time, "19:30");
    assert_eq!(slugs(&updated), vec!["vip"]);
}

#[tokio::test]
async fn test_duplicate_spellings_collapse_to_one_link() {
    let pool = setup().await;
    let id = create_reservation(&pool, draft("Ana", "2025-03-14", &["Catering"]))
        .await
        .unwrap()
        .reservation
        .id;

    let updated = update_reservation(&pool, id, tags_patch(&["VIP", "vip", "  VIP "]))
        .await
        .unwrap();

    assert_eq!(slugs(&updated), vec!["vip"]);
    assert_eq!(updated.reservation.tags_summary, "VIP");
    assert_eq!(count(&pool, "reservation_area_tag").await, 1);
}

#[tokio::test]
async fn test_respelled_tag_updates_display_name() {
    let pool = setup().await;
    let id = create_reservation(&pool, draft("Ana", "2025-03-14", &["Pop-Up"]))
        .await
        .unwrap()
        .reservation
        .id;

    let updated = update_reservation(&pool, id, tags_patch(&["POP UP"]))
        .await
        .unwrap();

    assert_eq!(updated.area_tags.len(), 1);
    assert_eq!(updated.area_tags[0].slug, "pop-up");
    assert_eq!(updated.area_tags[0].name, "POP UP");
    assert_eq!(updated.reservation.tags_summary, "POP UP");
    assert_eq!(count(&pool, "area_tag").await, 1);
}

#[tokio::test]
async fn test_empty_tag_list_clears_links() {
    let pool = setup().await;
    let id = create_reservation(&pool, draft("Ana", "2025-03-14", &["Catering", "Delivery"]))
        .await
        .unwrap()
        .reservation
        .id;

    let updated = update_reservation(&pool, id, tags_patch(&[])).await.unwrap();

    assert!(updated.area_tags.is_empty());
    assert_eq!(updated.reservation.tags_summary, "");
    assert_eq!(count(&pool, "area_tag").await, 2);
}

#[tokio::test]
async fn test_failure_during_additions_rolls_back_everything() {
    let pool = setup().await;
    let created = create_reservation(&pool, draft("Ana", "2025-03-14", &["Catering", "Delivery"]))
        .await
        .unwrap();
    let id = created.reservation.id;

    sqlx::query(
        "CREATE TRIGGER fail_on_boom BEFORE INSERT ON area_tag WHEN NEW.slug = 'boom' BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
    )
    .execute(&pool)
    .await
    .unwrap();

    let mut patch = tags_patch(&["Delivery", "Takeout", "Boom"]);
    patch.name = Some("Someone Else".into());
    patch.status = Some(ReservationStatus::Confirmed);

    let err = update_reservation(&pool, id, patch).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    let after = get_reservation(&pool, id).await.unwrap();
    assert_eq!(after, created);
    assert_eq!(slugs(&after), vec!["catering", "delivery"]);
    assert_eq!(after.reservation.tags_summary, "Catering, Delivery");
    // "Takeout" was created inside the failed transaction
    assert!(area_tag::find_by_slug(&pool, "takeout")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_missing_reservation_performs_no_writes() {
    let pool = setup().await;
    create_reservation(&pool, draft("Ana", "2025-03-14", &["Catering"]))
        .await
        .unwrap();
    let reservations_before = count(&pool, "reservation").await;
    let tags_before = count(&pool, "area_tag").await;
    let links_before = count(&pool, "reservation_area_tag").await;

    let mut patch = tags_patch(&["Brand New"]);
    patch.name = Some("Ghost".into());
    let err = update_reservation(&pool, 42, patch).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ReservationNotFound);
    assert_eq!(count(&pool, "reservation").await, reservations_before);
    assert_eq!(count(&pool, "area_tag").await, tags_before);
    assert_eq!(count(&pool, "reservation_area_tag").await, links_before);
    assert!(area_tag::find_by_slug(&pool, "brand-new")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_all_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("popup.db");
    let pool = DbService::new(path.to_str().unwrap()).await.unwrap().pool;

    let created = create_reservation(&pool, draft("Ana", "2025-03-14", &["Catering"]))
        .await
        .unwrap();
    let id = created.reservation.id;

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                let table = format!("Table {i}");
                let mut patch = tags_patch(&[table.as_str(), "Delivery"]);
                patch.guests = Some(i % 50 + 1);
                update_reservation(&pool, id, patch).await
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result.is_ok(), "update failed: {:?}", result.err());
    }

    // last committer wins: one table tag plus Delivery, summary agrees
    let after = get_reservation(&pool, id).await.unwrap();
    assert_eq!(after.area_tags.len(), 2);
    let table = after
        .area_tags
        .iter()
        .find(|t| t.slug != "delivery")
        .unwrap();
    assert_eq!(
        after.reservation.tags_summary,
        format!("{}, Delivery", table.name)
    );
    assert_eq!(count(&pool, "reservation_area_tag").await, 2);
    assert_eq!(count(&pool, "area_tag").await, 22);
    pool.close().await;
}

// ========================================================================
// Reads / delete
// ========================================================================

#[tokio::test]
async fn test_get_missing_reservation() {
    let pool = setup().await;
    let err = get_reservation(&pool, 7).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationNotFound);
    assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_cascades_links_only() {
    let pool = setup().await;
    let id = create_reservation(&pool, draft("Ana", "2025-03-14", &["Catering"]))
        .await
        .unwrap()
        .reservation
        .id;

    delete_reservation(&pool, id).await.unwrap();
    assert_eq!(count(&pool, "reservation_area_tag").await, 0);
    assert_eq!(count(&pool, "area_tag").await, 1);

    let err = delete_reservation(&pool, id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationNotFound);
}

#[tokio::test]
async fn test_deleting_area_tag_drops_its_links() {
    let pool = setup().await;
    let id = create_reservation(&pool, draft("Ana", "2025-03-14", &["Catering", "VIP"]))
        .await
        .unwrap()
        .reservation
        .id;

    assert!(area_tag::delete(&pool, "vip").await.unwrap());

    let detail = get_reservation(&pool, id).await.unwrap();
    assert_eq!(slugs(&detail), vec!["catering"]);
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let pool = setup().await;
    area_tag::create(
        &pool,
        AreaTagCreate {
            name: "Boca Raton".into(),
            slug: None,
            description: None,
            is_active: None,
        },
    )
    .await
    .unwrap();

    let ana = create_reservation(&pool, draft("Ana Lima", "2025-03-14", &["Downtown"]))
        .await
        .unwrap();
    create_reservation(&pool, draft("Bruno", "2025-05-01", &["Boca Raton"]))
        .await
        .unwrap();
    create_reservation(&pool, draft("Carla", "2025-04-10", &["Downtown", "VIP"]))
        .await
        .unwrap();
    update_reservation(
        &pool,
        ana.reservation.id,
        ReservationPatch {
            status: Some(ReservationStatus::Confirmed),
            notes: Some("Window table please".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Default sort: date descending
    let page = list_reservations(&pool, ReservationListQuery::default())
        .await
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|d| d.reservation.name.as_str()).collect();
    assert_eq!(names, vec!["Bruno", "Carla", "Ana Lima"]);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.page_size, DEFAULT_PAGE_SIZE);

    let asc = list_reservations(
        &pool,
        ReservationListQuery {
            sort: Some("date-asc".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(asc.items[0].reservation.name, "Ana Lima");

    // Search is case-insensitive and covers notes
    let found = list_reservations(
        &pool,
        ReservationListQuery {
            search: Some("WINDOW".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(found.pagination.total, 1);
    assert_eq!(found.items[0].reservation.id, ana.reservation.id);

    let confirmed = list_reservations(
        &pool,
        ReservationListQuery {
            status: Some("confirmed".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(confirmed.pagination.total, 1);

    // Unknown status is ignored
    let all = list_reservations(
        &pool,
        ReservationListQuery {
            status: Some("archived".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(all.pagination.total, 3);

    let downtown = list_reservations(
        &pool,
        ReservationListQuery {
            tag: Some("downtown".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(downtown.pagination.total, 2);
    assert!(downtown.items.iter().all(|d| d
        .area_tags
        .iter()
        .any(|t| t.slug == "downtown")));
    // Other tags of matching reservations are still listed
    assert!(downtown.items.iter().any(|d| d.area_tags.len() == 2));

    let second_page = list_reservations(
        &pool,
        ReservationListQuery {
            page: Some(2),
            page_size: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(second_page.items.len(), 1);
    assert_eq!(second_page.pagination.total_pages, 2);
    assert_eq!(second_page.items[0].reservation.name, "Ana Lima");
}

#[tokio::test]
async fn test_list_clamps_paging() {
    let pool = setup().await;
    let page = list_reservations(
        &pool,
        ReservationListQuery {
            page: Some(0),
            page_size: Some(1000),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.page_size, MAX_PAGE_SIZE);
    assert_eq!(page.pagination.total, 0);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let pool = setup().await;
    create_reservation(&pool, draft("Ana", "2025-03-14", &[]))
        .await
        .unwrap();

    let page = list_reservations(
        &pool,
        ReservationListQuery {
            search: Some("%".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.pagination.total, 0);
}
