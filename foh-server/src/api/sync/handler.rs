//! Sync API Handlers
//!
//! WebSocket clients receive every [`BusMessage`] as a JSON text frame.
//! Browsers cannot set headers on a WebSocket handshake, so the token
//! travels in the query string.

use std::collections::{BTreeMap, HashSet};

use axum::{
    Json,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::Uri,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use shared::message::{BusMessage, NotificationPayload};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::auth::CurrentUser;
use crate::auth::middleware::{authenticate_token, load_staff_user};
use crate::auth::permissions::STAFF_MANAGE;
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: String,
    /// Comma separated resource names; all resources when absent
    pub resources: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncVersions {
    pub versions: BTreeMap<String, u64>,
}

/// Resource filter of one connection, `None` = everything
fn parse_resources(raw: Option<&str>) -> Option<HashSet<String>> {
    let set: HashSet<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!set.is_empty()).then_some(set)
}

/// Resources whose payloads need a permission beyond being logged in
const GUARDED_RESOURCES: &[(&str, &str)] = &[("staff", STAFF_MANAGE)];

/// Notifications always pass. Sync messages pass when the user may read the
/// resource and it is in the connection's filter.
fn wanted(user: &CurrentUser, filter: Option<&HashSet<String>>, msg: &BusMessage) -> bool {
    let Some(resource) = msg.resource() else {
        return true;
    };
    let allowed = GUARDED_RESOURCES
        .iter()
        .filter(|(guarded, _)| *guarded == resource)
        .all(|(_, permission)| user.has_permission(permission));
    allowed && filter.is_none_or(|filter| filter.contains(resource))
}

/// GET /api/sync/ws
///
/// The token is checked before the upgrade request itself.
pub async fn websocket(
    State(state): State<ServerState>,
    Query(query): Query<WsQuery>,
    uri: Uri,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> AppResult<Response> {
    let claimed = authenticate_token(state.get_jwt_service(), &query.token, &uri)?;
    let user = load_staff_user(&state, claimed, &uri).await?;
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let filter = parse_resources(query.resources.as_deref());

    let bus = state.message_bus();
    let rx = bus.subscribe();
    let shutdown = bus.shutdown_token().clone();

    Ok(ws.on_upgrade(move |socket| stream(socket, rx, filter, shutdown, user)))
}

async fn stream(
    mut socket: WebSocket,
    mut rx: tokio::sync::broadcast::Receiver<BusMessage>,
    filter: Option<HashSet<String>>,
    shutdown: CancellationToken,
    user: CurrentUser,
) {
    tracing::info!(username = %user.username, "Sync client connected");

    loop {
        let outgoing = tokio::select! {
            _ = shutdown.cancelled() => break,
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // pings are answered by the protocol layer
                Some(Ok(_)) => continue,
            },
            received = rx.recv() => match received {
                Ok(msg) if wanted(&user, filter.as_ref(), &msg) => msg,
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(
                        username = %user.username,
                        missed,
                        "Sync client lagged, requesting resync"
                    );
                    BusMessage::notification(&NotificationPayload::resync(missed))
                }
                Err(RecvError::Closed) => break,
            },
        };

        let text = match serde_json::to_string(&outgoing) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode bus message");
                continue;
            }
        };
        if socket.send(Message::Text(text.into())).await.is_err() {
            break;
        }
    }

    let _ = socket.send(Message::Close(None)).await;
    tracing::info!(username = %user.username, "Sync client disconnected");
}

/// GET /api/sync/versions
pub async fn versions(State(state): State<ServerState>) -> Json<SyncVersions> {
    Json(SyncVersions {
        versions: state.resource_versions.snapshot().into_iter().collect(),
    })
}
