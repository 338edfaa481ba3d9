//! 消息总线核心实现
//!
//! 单一 `tokio::sync::broadcast` 通道: 服务端发布，所有 WebSocket 订阅者接收。
//! 订阅者处理过慢时会收到 `Lagged`，由订阅方发送 resync 通知。

use shared::message::BusMessage;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Capacity of the broadcast channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// 消息总线 - 负责向订阅者广播
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<BusMessage>,
    shutdown_token: CancellationToken,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 发布消息 (服务器 -> 所有订阅者)
    ///
    /// Returns how many subscribers received it; no subscribers is not an error.
    pub fn publish(&self, msg: BusMessage) -> usize {
        match self.tx.send(msg) {
            Ok(n) => n,
            Err(_) => {
                tracing::trace!("No subscribers for bus message");
                0
            }
        }
    }

    /// 订阅服务器广播
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// 获取关闭令牌 (WebSocket 会话监听此令牌退出)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 通知所有订阅者关闭
    pub fn shutdown(&self) {
        self.publish(BusMessage::notification(
            &shared::message::NotificationPayload::shutdown(),
        ));
        self.shutdown_token.cancel();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
