use crate::auth::JwtConfig;
use crate::core::Result;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | popup.db | SQLite 数据库文件 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 日志目录 (设置后按天滚动写文件) |
/// | JWT_SECRET | (dev: random) | 管理员令牌密钥, 至少 32 字符 |
/// | JWT_ISSUER | site-server | 令牌签发者 |
/// | JWT_AUDIENCE | site-admin | 令牌受众 |
/// | SEED_DEFAULT_TAGS | true | 启动时补齐默认区域标签 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/popup.db HTTP_PORT=8080 cargo run -p site-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 数据库文件路径 (`:memory:` 用于测试)
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 启动时写入默认区域标签
    pub seed_default_tags: bool,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的变量使用默认值; 非开发环境缺少 `JWT_SECRET` 时报错
    pub fn from_env() -> Result<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let jwt = JwtConfig::from_env(&environment)?;

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "popup.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            jwt,
            seed_default_tags: std::env::var("SEED_DEFAULT_TAGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            environment,
        })
    }

    /// 内存数据库 + 固定密钥, 常用于测试场景
    pub fn for_tests(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_path: ":memory:".into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "debug".into(),
            log_dir: None,
            jwt: JwtConfig::with_secret(jwt_secret),
            seed_default_tags: false,
            request_timeout_ms: 30000,
        }
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
