//! Area Tag API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, area_tag};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, trim_optional, validate_min_text, validate_optional_text,
    validate_slug,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{AreaTag, AreaTagCreate, AreaTagListQuery, AreaTagUpdate};
use shared::slug::normalize;

const MIN_TAG_NAME_LEN: usize = 2;

/// GET /api/area-tags - 标签列表 (默认仅启用的)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AreaTagListQuery>,
) -> AppResult<Json<ApiResponse<Vec<AreaTag>>>> {
    let tags = area_tag::find_all(&state.pool, query.include_inactive).await?;
    Ok(Json(ApiResponse::success(tags)))
}

/// POST /api/area-tags - 创建标签
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<AreaTagCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<AreaTag>>)> {
    let name = payload.name.trim().to_string();
    validate_min_text(&name, "name", MIN_TAG_NAME_LEN, MAX_NAME_LEN)?;

    let slug = match trim_optional(payload.slug) {
        Some(slug) => slug,
        None => normalize(&name),
    };
    validate_slug(&slug)?;

    let description = trim_optional(payload.description);
    validate_optional_text(&description, "description", MAX_NOTE_LEN)?;

    let tag = area_tag::create(
        &state.pool,
        AreaTagCreate {
            name,
            slug: Some(slug),
            description,
            is_active: payload.is_active,
        },
    )
    .await
    .map_err(tag_error)?;

    tracing::info!(
        area_tag = %tag.slug,
        operator = %current_user.username,
        "Area tag created"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tag))))
}

/// PUT /api/area-tags/:slug - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(slug): Path<String>,
    Json(payload): Json<AreaTagUpdate>,
) -> AppResult<Json<ApiResponse<AreaTag>>> {
    let name = payload.name.map(|n| n.trim().to_string());
    if let Some(name) = &name {
        validate_min_text(name, "name", MIN_TAG_NAME_LEN, MAX_NAME_LEN)?;
    }

    let new_slug = payload.slug.map(|s| s.trim().to_string());
    if let Some(new_slug) = &new_slug {
        validate_slug(new_slug)?;
    }

    // present-but-blank description is stored as ""
    let description = payload.description.map(|d| d.trim().to_string());
    validate_optional_text(&description, "description", MAX_NOTE_LEN)?;

    let tag = area_tag::update(
        &state.pool,
        &slug,
        AreaTagUpdate {
            name,
            slug: new_slug,
            description,
            is_active: payload.is_active,
        },
    )
    .await
    .map_err(tag_error)?;

    tracing::info!(
        area_tag = %tag.slug,
        operator = %current_user.username,
        "Area tag updated"
    );
    Ok(Json(ApiResponse::success(tag)))
}

/// DELETE /api/area-tags/:slug - 删除标签 (关联随之删除)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    if !area_tag::delete(&state.pool, &slug).await? {
        return Err(not_found(&slug));
    }

    tracing::info!(
        area_tag = %slug,
        operator = %current_user.username,
        "Area tag deleted"
    );
    Ok(Json(ApiResponse::success(true)))
}

fn not_found(slug: &str) -> AppError {
    AppError::new(ErrorCode::AreaTagNotFound).with_detail("slug", slug)
}

fn tag_error(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AreaTagSlugExists, msg),
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::AreaTagNotFound, msg),
        other => other.into(),
    }
}
