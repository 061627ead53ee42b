//! Default area tags
//!
//! Inserted on startup when missing; existing rows (including renamed or
//! deactivated ones) are left untouched.

use shared::slug::normalize;
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, area_tag};

pub const DEFAULT_AREA_TAGS: &[&str] = &[
    "Virgin Islands",
    "St. Thomas",
    "St. John",
    "Caribbean",
    "Boca Raton",
    "Downtown",
    "Pop-Up",
    "Wood-Fired Pizza",
    "Delivery",
    "Takeout",
    "Catering",
];

/// Insert every default tag whose slug is not taken yet. Returns the number inserted.
pub async fn seed_default_area_tags(pool: &SqlitePool) -> RepoResult<u64> {
    let mut inserted = 0;
    for name in DEFAULT_AREA_TAGS {
        if area_tag::insert_if_missing(pool, name, &normalize(name)).await? {
            inserted += 1;
        }
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = DbService::in_memory().await.unwrap();

        let first = seed_default_area_tags(&db.pool).await.unwrap();
        assert_eq!(first, DEFAULT_AREA_TAGS.len() as u64);

        let second = seed_default_area_tags(&db.pool).await.unwrap();
        assert_eq!(second, 0);

        let tags = area_tag::find_all(&db.pool, true).await.unwrap();
        assert_eq!(tags.len(), DEFAULT_AREA_TAGS.len());
        assert!(tags.iter().any(|t| t.slug == "st-thomas" && t.name == "St. Thomas"));
        assert!(tags.iter().any(|t| t.slug == "wood-fired-pizza"));
    }

    #[tokio::test]
    async fn test_seed_skips_existing_slug() {
        let db = DbService::in_memory().await.unwrap();
        area_tag::insert_if_missing(&db.pool, "DOWNTOWN", "downtown")
            .await
            .unwrap();

        let inserted = seed_default_area_tags(&db.pool).await.unwrap();
        assert_eq!(inserted, DEFAULT_AREA_TAGS.len() as u64 - 1);

        let downtown = area_tag::find_by_slug(&db.pool, "downtown")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(downtown.name, "DOWNTOWN");
    }
}
