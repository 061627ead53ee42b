//! Area Tag Model

use serde::{Deserialize, Serialize};

/// Area tag entity (区域标签：Downtown、Catering、St. Thomas 等)
///
/// `slug` is unique and always derived through [`crate::slug::normalize`]
/// unless an admin set it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AreaTag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Tag as resolved on a reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AreaTagRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Create area tag payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaTagCreate {
    pub name: String,
    /// Defaults to the normalized name
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Update area tag payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreaTagUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Query string for `GET /api/area-tags`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AreaTagListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}
