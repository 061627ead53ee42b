use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::db::{self, DbService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Arc<Config> | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
///
/// Clone 只复制引用, 可直接作为 axum `State` 使用。
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 打开数据库、执行迁移、按配置写入默认标签
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = if config.database_path == ":memory:" {
            DbService::in_memory().await?
        } else {
            DbService::new(&config.database_path).await?
        };

        if config.seed_default_tags {
            let inserted = db::seed::seed_default_area_tags(&db.pool).await?;
            tracing::info!(inserted, "Default area tags ensured");
        }

        Ok(Self::new(config.clone(), db.pool))
    }

    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config: Arc::new(config),
            pool,
            jwt_service,
        }
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
