//! Area Tag API 模块
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /api/area-tags | GET | 公共 |
//! | /api/area-tags | POST | ADMIN |
//! | /api/area-tags/{slug} | PUT / DELETE | ADMIN |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/area-tags", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let public_routes = Router::new().route("/", get(handler::list));

    let admin_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{slug}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    public_routes.merge(admin_routes)
}
