//! Reservation API 模块
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/reservations | POST | 公共 (预订表单) |
//! | /api/reservations | GET | ADMIN |
//! | /api/reservations/{id} | GET / PUT / DELETE | ADMIN |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let public_routes = Router::new().route("/", post(handler::create));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public_routes.merge(admin_routes)
}
