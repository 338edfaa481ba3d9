//! 资源同步发布
//!
//! 写操作完成后由 [`SyncPublisher`] 递增资源版本并广播 [`SyncPayload`]。
//! 订单和桌台写入在持有桌台锁时发布，版本号顺序与落库顺序一致。

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use shared::message::{BusMessage, SyncPayload};

use super::MessageBus;

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。
/// 每种资源类型维护独立的版本号，支持原子递增。
///
/// 客户端重连后对比 `/api/sync/versions` 判断是否需要全量刷新。
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 递增指定资源的版本号并返回新值 (首次返回 1)
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 当前版本号，未知资源为 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// 所有资源的版本快照
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let mut all: Vec<(String, u64)> = self
            .versions
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();
        all.sort();
        all
    }
}

/// Version bump + broadcast, shared by the state and the services
#[derive(Debug, Clone)]
pub struct SyncPublisher {
    bus: Arc<MessageBus>,
    versions: Arc<ResourceVersions>,
}

impl SyncPublisher {
    pub fn new(bus: Arc<MessageBus>, versions: Arc<ResourceVersions>) -> Self {
        Self { bus, versions }
    }

    /// 广播同步消息
    ///
    /// - `resource`: 资源类型 ("order", "dining_table", "menu_item" ...)
    /// - `action`: "created" | "updated" | "deleted"
    /// - `id`: 资源 ID
    /// - `data`: 资源数据 (deleted 时为 None)
    pub fn publish<T: Serialize>(&self, resource: &str, action: &str, id: &str, data: Option<&T>) {
        let version = self.versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        let receivers = self.bus.publish(BusMessage::sync(&payload));
        tracing::debug!(resource, action, id, version, receivers, "Sync broadcast");
    }
}
