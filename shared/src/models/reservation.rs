//! Reservation Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::AreaTagRef;

/// Reservation status
///
/// Intended flow is PENDING → CONFIRMED → CANCELLED (or PENDING → CANCELLED),
/// but any value may be written by an admin at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Case-insensitive parse, used by list filters where unknown values are ignored
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Reservation entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub date: NaiveDate,
    /// Slot as submitted, e.g. "19:30"
    pub time: String,
    pub guests: i32,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    /// Requested tag names joined by ", "
    pub tags_summary: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Reservation with its resolved area tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub area_tags: Vec<AreaTagRef>,
}

/// Public reservation form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// ISO date (`2025-03-14`) or RFC 3339 timestamp
    pub date: String,
    pub time: String,
    pub guests: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Admin partial update payload
///
/// Absent fields are left untouched; `tags`, when present, replaces the
/// whole tag list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub guests: Option<i32>,
    pub notes: Option<String>,
    pub status: Option<ReservationStatus>,
    pub tags: Option<Vec<String>>,
}

/// Sort order for the admin reservation list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationSort {
    /// Event date descending, then newest submissions first
    #[default]
    #[serde(rename = "date-desc")]
    DateDesc,
    /// Event date ascending, then oldest submissions first
    #[serde(rename = "date-asc")]
    DateAsc,
    /// Newest submissions first
    #[serde(rename = "created-desc")]
    CreatedDesc,
}

impl ReservationSort {
    /// Unknown values fall back to [`ReservationSort::DateDesc`]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "date-asc" => Self::DateAsc,
            "created-desc" => Self::CreatedDesc,
            _ => Self::DateDesc,
        }
    }
}

/// Query string for `GET /api/reservations`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    /// Area tag slug
    pub tag: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<String>,
}
