//! Data models
//!
//! Shared between the site server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod area_tag;
pub mod page;
pub mod reservation;

// Re-exports
pub use area_tag::*;
pub use page::*;
pub use reservation::*;
