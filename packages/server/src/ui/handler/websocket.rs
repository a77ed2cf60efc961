//! WebSocket connection handlers.
//!
//! One task pair per connection: the receive loop dispatches inbound frames to the
//! use cases, the pusher loop writes outbound notifications to the socket. When
//! either side ends, the disconnect cleanup runs exactly once.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, Notification, PusherChannel, SignalPayload},
    infrastructure::{dto::websocket::ClientMessage, message_pusher::encode_notification},
    ui::state::AppState,
    usecase::{
        JoinRoomInput, LeaveRoomInput, RelaySignalInput, StartScreenShareInput,
        StopScreenShareInput,
    },
};

const INVALID_MESSAGE: &str = "Invalid message";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive notifications
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_client_usecase.execute(tx.clone()).await;
    tracing::info!("Client '{}' connected", connection_id);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&state_clone, &connection_id_clone, &tx, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push notifications to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let deliveries = state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await;
    tracing::info!(
        "Client '{}' disconnected ({} notifications sent)",
        connection_id,
        deliveries.len()
    );
}

async fn handle_text(
    state: &AppState,
    connection_id: &ConnectionId,
    tx: &PusherChannel,
    text: &str,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Failed to parse message from '{}': {}", connection_id, e);
            send_error(tx, INVALID_MESSAGE);
            return;
        }
    };

    if let Some(error) = dispatch(state, connection_id, message).await {
        send_error(tx, error);
    }
}

/// Run the use case for one inbound message; returns the `error` event to send back, if any
async fn dispatch(
    state: &AppState,
    connection_id: &ConnectionId,
    message: ClientMessage,
) -> Option<&'static str> {
    match message {
        ClientMessage::JoinRoom {
            room,
            user_id,
            username,
        } => {
            let result = async {
                let input = JoinRoomInput::parse(room, user_id, username)?;
                state.join_room_usecase.execute(connection_id, input).await
            }
            .await;
            if let Err(e) = result {
                tracing::warn!("join-room from '{}' failed: {}", connection_id, e);
                return e.client_message();
            }
        }
        ClientMessage::LeaveRoom { room, user_id } => {
            let result = async {
                let input = LeaveRoomInput::parse(room, user_id)?;
                state.leave_room_usecase.execute(input).await
            }
            .await;
            if let Err(e) = result {
                tracing::debug!("leave-room from '{}' ignored: {}", connection_id, e);
            }
        }
        ClientMessage::Signal {
            room,
            target_user,
            from_user,
            description,
            candidate,
        } => {
            let payload = SignalPayload {
                description,
                candidate,
            };
            let result = async {
                let input = RelaySignalInput::parse(room, target_user, from_user, payload)?;
                state.relay_signal_usecase.execute(connection_id, input).await
            }
            .await;
            if let Err(e) = result {
                tracing::warn!("signal from '{}' dropped: {}", connection_id, e);
            }
        }
        ClientMessage::StartScreenShare {
            room,
            user_id,
            username,
        } => {
            let result = async {
                let input = StartScreenShareInput::parse(room, user_id, username)?;
                state.start_screen_share_usecase.execute(input).await
            }
            .await;
            if let Err(e) = result {
                tracing::debug!("start-screen-share from '{}' ignored: {}", connection_id, e);
            }
        }
        ClientMessage::StopScreenShare { room, user_id } => {
            let result = async {
                let input = StopScreenShareInput::parse(room, user_id)?;
                state.stop_screen_share_usecase.execute(input).await
            }
            .await;
            if let Err(e) = result {
                tracing::debug!("stop-screen-share from '{}' ignored: {}", connection_id, e);
            }
        }
    }
    None
}

fn send_error(tx: &PusherChannel, message: &str) {
    let notification = Notification::Error {
        message: message.to_string(),
    };
    match encode_notification(&notification) {
        Ok(json) => {
            // The receiver is gone only when the connection is closing
            let _ = tx.send(json);
        }
        Err(e) => tracing::error!("Failed to encode error message: {}", e),
    }
}
