use std::sync::Arc;
use std::time::Instant;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::menu::MenuService;
use crate::message::{MessageBus, ResourceVersions, SyncPublisher};
use crate::orders::{OrderService, TableLocks};
use crate::tables::TableService;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，作为 axum 的 `State` 在每个请求间克隆。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | jwt_service | JWT 认证服务 |
/// | message_bus | 实时同步总线 |
/// | resource_versions | 资源版本号 |
/// | table_locks | 按桌号串行化订单写入 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub message_bus: Arc<MessageBus>,
    pub resource_versions: Arc<ResourceVersions>,
    pub table_locks: Arc<TableLocks>,
    started_at: Instant,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 工作目录
    /// 2. 数据库 + schema
    /// 3. 初始管理员
    /// 4. JWT / 消息总线
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_service = DbService::new(config.database_path.as_deref()).await?;
        db_service
            .seed_admin(&config.admin_username, &config.admin_password)
            .await?;

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            message_bus: Arc::new(MessageBus::new()),
            resource_versions: Arc::new(ResourceVersions::new()),
            table_locks: Arc::new(TableLocks::new()),
            started_at: Instant::now(),
        })
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn message_bus(&self) -> &MessageBus {
        &self.message_bus
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// 订单服务 (共享桌台锁)
    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.get_db(), self.table_locks.clone(), self.sync_publisher())
    }

    pub fn table_service(&self) -> TableService {
        TableService::new(self.get_db(), self.table_locks.clone(), self.sync_publisher())
    }

    pub fn menu_service(&self) -> MenuService {
        MenuService::new(self.get_db())
    }

    pub fn sync_publisher(&self) -> SyncPublisher {
        SyncPublisher::new(self.message_bus.clone(), self.resource_versions.clone())
    }

    /// 广播同步消息 (see [`SyncPublisher::publish`])
    ///
    /// Order and table writes publish from their services while the table
    /// lock is held; other resources publish from their handlers.
    pub fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        self.sync_publisher().publish(resource, action, id, data);
    }
}
