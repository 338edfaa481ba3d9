//! 消息载荷定义

use serde::{Deserialize, Serialize};

/// 同步信号载荷 (服务端 -> 所有客户端)
///
/// 每次写入后广播，客户端据此刷新本地数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// 资源类型 ("order", "dining_table", "menu_item", "category", "staff")
    pub resource: String,
    /// 资源版本号，单调递增
    pub version: u64,
    /// 变更类型 ("created", "updated", "deleted", "status_changed")
    pub action: String,
    /// 资源 ID ("table:key")
    pub id: String,
    /// 资源数据 (deleted 时为 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The subscriber missed messages and must reload everything
    Resync,
    /// Server is going down
    Shutdown,
    Info,
}

/// 通知载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub kind: NotificationKind,
    pub message: String,
}

impl NotificationPayload {
    /// Sent to a subscriber that lagged behind the bus
    pub fn resync(missed: u64) -> Self {
        Self {
            kind: NotificationKind::Resync,
            message: format!("missed {missed} messages, reload all resources"),
        }
    }

    pub fn shutdown() -> Self {
        Self {
            kind: NotificationKind::Shutdown,
            message: "server is shutting down".to_string(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}
