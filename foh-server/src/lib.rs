//! FOH Server - 餐厅前厅服务
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 订单状态机、按桌串行化写入、桌台占用/释放
//! - **桌台** (`tables`): 桌台 CRUD 与状态规则
//! - **菜单** (`menu`): 菜品、分类、顾客菜单
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **消息总线** (`message`): 变更广播，WebSocket 推送
//! - **统计** (`analytics`): 区间营业汇总
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! foh-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (models + repository)
//! ├── orders/        # 订单服务
//! ├── tables/        # 桌台服务
//! ├── menu/          # 菜单服务
//! ├── analytics/     # 统计汇总
//! ├── message/       # 消息总线
//! └── utils/         # 错误、日志、时间、校验
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod menu;
pub mod message;
pub mod orders;
pub mod tables;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::{BusMessage, EventType, MessageBus};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, periodic_cleanup};

// Security logging macro - 写入 target "security"，单独落盘
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 启动前的环境准备: 加载 `.env`，创建工作目录，初始化日志
///
/// Returns the loaded configuration.
pub fn setup_environment() -> anyhow::Result<Config> {
    if let Err(e) = dotenv::dotenv() {
        // .env is optional
        eprintln!("No .env file loaded: {e}");
    }

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_dir = config.log_dir();
    init_logger(
        &config.log_level,
        config.log_json,
        Some(&log_dir.to_string_lossy()),
    )?;
    config.warn_insecure_defaults();

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ______ ____  __  __
   / ____// __ \/ / / /
  / /_   / / / / /_/ /
 / __/  / /_/ / __  /
/_/     \____/_/ /_/   front of house
    "#
    );
}
