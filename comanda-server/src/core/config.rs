//! 服务器配置

use chrono_tz::Tz;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | data/comanda.db | SQLite 数据库文件 |
/// | TIMEZONE | America/Sao_Paulo | 业务时区 (统计口径) |
/// | ENVIRONMENT | development | 运行环境 |
/// | EVENT_BUFFER_CAPACITY | 100 | 每门店事件环形缓冲容量 |
/// | AUDIT_BUFFER_SIZE | 256 | 审计日志队列容量 |
/// | LOG_DIR | (无) | 日志文件目录，未设置则仅输出到终端 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/comanda.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// 业务时区 — 厨房统计的"今天"按此时区的午夜到午夜计算
    pub timezone: Tz,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 每门店事件环形缓冲容量
    pub event_buffer_capacity: usize,
    /// 审计日志队列容量
    pub audit_buffer_size: usize,
    /// 日志文件目录 (可选)
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/comanda.db".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::America::Sao_Paulo),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            event_buffer_capacity: std::env::var("EVENT_BUFFER_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            audit_buffer_size: std::env::var("AUDIT_BUFFER_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
