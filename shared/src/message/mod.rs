//! 消息总线消息类型定义
//!
//! Shared between foh-server and its clients. On the WebSocket every
//! [`BusMessage`] is sent as one JSON text frame:
//!
//! ```json
//! { "request_id": "…", "event_type": "sync",
//!   "payload": { "resource": "order", "version": 7, "action": "updated", "id": "order:abc", "data": { } } }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// 消息总线事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// 系统通知 (resync requests, shutdown notices)
    Notification,
    /// 资源变更信号
    Sync,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Notification => write!(f, "notification"),
            EventType::Sync => write!(f, "sync"),
        }
    }
}

/// 消息总线消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    pub event_type: EventType,
    pub payload: Value,
}

impl BusMessage {
    fn new<T: Serialize>(event_type: EventType, payload: &T) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            event_type,
            payload: serde_json::to_value(payload).unwrap_or(Value::Null),
        }
    }

    /// 创建同步信号消息
    pub fn sync(payload: &SyncPayload) -> Self {
        Self::new(EventType::Sync, payload)
    }

    /// 创建通知消息
    pub fn notification(payload: &NotificationPayload) -> Self {
        Self::new(EventType::Notification, payload)
    }

    /// 解析载荷为指定类型
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }

    /// Resource name for sync messages, `None` for notifications
    pub fn resource(&self) -> Option<&str> {
        match self.event_type {
            EventType::Sync => self.payload.get("resource").and_then(Value::as_str),
            EventType::Notification => None,
        }
    }
}
