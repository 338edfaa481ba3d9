//! 消息总线
//!
//! ```text
//! handler write ──▶ ServerState::broadcast_sync ──▶ MessageBus::publish
//!                                                        │
//!                                    broadcast::Sender<BusMessage>
//!                                                        │
//!                         ┌──────────────────────────────┼──────────────┐
//!                         ▼                              ▼              ▼
//!                 /api/sync/ws client           /api/sync/ws client    tests
//! ```

pub mod bus;
pub mod sync;

pub use bus::{MessageBus, DEFAULT_CHANNEL_CAPACITY};
pub use sync::{ResourceVersions, SyncPublisher};
pub use shared::message::{BusMessage, EventType, NotificationPayload, SyncPayload};
