//! Reservation API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::reservations::{self, ReservationDraft, ReservationPatch};
use crate::utils::{ApiResponse, AppResult};
use shared::models::{
    Paginated, ReservationCreate, ReservationDetail, ReservationListQuery, ReservationUpdate,
};

/// POST /api/reservations - 提交预订 (公共)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReservationDetail>>)> {
    let draft = ReservationDraft::validate(payload)?;
    let detail = reservations::create_reservation(&state.pool, draft).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(detail))))
}

/// GET /api/reservations - 预订列表 (搜索/筛选/分页)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ReservationListQuery>,
) -> AppResult<Json<ApiResponse<Paginated<ReservationDetail>>>> {
    let page = reservations::list_reservations(&state.pool, query).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// GET /api/reservations/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ReservationDetail>>> {
    let detail = reservations::get_reservation(&state.pool, id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// PUT /api/reservations/:id - 部分更新 + 标签同步
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<ApiResponse<ReservationDetail>>> {
    let patch = ReservationPatch::validate(payload)?;
    let detail = reservations::update_reservation(&state.pool, id, patch).await?;

    tracing::debug!(
        reservation_id = id,
        operator = %current_user.username,
        "Reservation updated by admin"
    );
    Ok(Json(ApiResponse::success(detail)))
}

/// DELETE /api/reservations/:id - 删除预订
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    reservations::delete_reservation(&state.pool, id).await?;

    tracing::info!(
        reservation_id = id,
        operator = %current_user.username,
        "Reservation deleted by admin"
    );
    Ok(Json(ApiResponse::success(true)))
}
