//! Site Server - pop-up restaurant website backend
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移、默认标签
//! - **预订** (`reservations`): 输入校验与预订事务 (字段更新 + 区域标签同步)
//! - **认证** (`auth`): JWT 管理员校验
//! - **HTTP API** (`api`): 公共表单接口与管理接口
//!
//! # 模块结构
//!
//! ```text
//! site-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── auth/          # JWT 认证、管理员中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── reservations/  # 预订校验与事务
//! ├── utils/         # 日志、校验工具
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod reservations;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::warn!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
