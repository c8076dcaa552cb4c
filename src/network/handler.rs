use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::warn;

use crate::network::commands::ConnectionCommand;
use crate::network::lobby::LobbyState;
use crate::network::messages::{deserialize_message, serialize_event, ClientMessage, ServerEvent};
use crate::relay::Audience;
use crate::{AppError, AppResult};

/// Binds inbound wire messages to core operations and queues the resulting
/// outbound events. The lobby lock is held for the whole mutation; queueing
/// onto the command channel is synchronous, so nothing interleaves between a
/// room mutation and the notifications describing it.
pub struct MessageHandler;

impl MessageHandler {
    pub async fn handle_text_message(
        text: &str,
        connection_id: &str,
        lobby_state: &Arc<Mutex<LobbyState>>,
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    ) -> AppResult<()> {
        let message = match deserialize_message(text) {
            Ok(message) => message,
            Err(e) => {
                let err = AppError::UnknownMessage {
                    message: e.to_string(),
                };
                warn!(connection_id, error = %err, "unparseable message");
                let event = ServerEvent::Error {
                    message: err.user_friendly_message(),
                };
                return Self::queue(cmd_sender, vec![(Audience::connection(connection_id), event)]);
            }
        };

        // Queue while still holding the lock: channel order must equal
        // mutation order, and another task could mutate and queue in the gap
        // between unlock and send.
        let mut state = lobby_state.lock().await;
        let deliveries = Self::dispatch(message, connection_id, &mut state);
        Self::queue(cmd_sender, deliveries)
    }

    /// The transport observed the socket closing. Behaves like a leave
    /// against whichever room held the connection; a connection that never
    /// joined is a no-op.
    pub async fn handle_disconnect(
        connection_id: &str,
        lobby_state: &Arc<Mutex<LobbyState>>,
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
    ) -> AppResult<()> {
        let mut state = lobby_state.lock().await;
        let deliveries = match state.room_manager.disconnect(connection_id) {
            Some(outcome) => {
                let notice = ServerEvent::PlayerDisconnected {
                    username: outcome.username.clone(),
                };
                Self::departure_events(
                    &outcome.room_id,
                    notice,
                    outcome.players,
                    outcome.room_destroyed,
                )
            }
            None => Vec::new(),
        };
        Self::queue(cmd_sender, deliveries)
    }

    fn dispatch(
        message: ClientMessage,
        connection_id: &str,
        state: &mut LobbyState,
    ) -> Vec<(Audience, ServerEvent)> {
        match message {
            ClientMessage::GetGameList => vec![(
                Audience::connection(connection_id),
                ServerEvent::GameList {
                    games: state.room_manager.list_joinable(),
                },
            )],

            ClientMessage::CheckRoom { room_id } => vec![(
                Audience::connection(connection_id),
                ServerEvent::RoomAvailable {
                    success: state.room_manager.check_availability(&room_id),
                },
            )],

            ClientMessage::JoinRoom { username, room_id } => {
                match state.room_manager.join(connection_id, &username, &room_id) {
                    Ok(outcome) => vec![
                        (
                            Audience::connection(connection_id),
                            ServerEvent::join_success(&outcome.room_name, outcome.players.clone()),
                        ),
                        (
                            Audience::room_except(&outcome.room_id, connection_id),
                            ServerEvent::PlayerJoined {
                                username: outcome.username,
                            },
                        ),
                        (
                            Audience::room(&outcome.room_id),
                            ServerEvent::PlayerList {
                                players: outcome.players,
                            },
                        ),
                        (Audience::all(), ServerEvent::GameListChanged),
                    ],
                    Err(e) => vec![(
                        Audience::connection(connection_id),
                        ServerEvent::join_failure(&e),
                    )],
                }
            }

            ClientMessage::LeaveRoom { room_id, .. } => {
                // The store's username is authoritative, not the one the
                // client sent.
                match state.room_manager.leave(connection_id, &room_id) {
                    Ok(outcome) => {
                        let notice = ServerEvent::PlayerLeft {
                            username: outcome.username.clone(),
                        };
                        Self::departure_events(
                            &outcome.room_id,
                            notice,
                            outcome.players,
                            outcome.room_destroyed,
                        )
                    }
                    // Already warn-logged by the manager; the event is dropped.
                    Err(_) => Vec::new(),
                }
            }

            ClientMessage::Chat {
                room_id,
                username,
                text,
            } => vec![(
                Audience::room_except(&room_id, connection_id),
                ServerEvent::Chat { username, text },
            )],

            ClientMessage::ShipData { room_id, layout } => vec![(
                Audience::room_except(&room_id, connection_id),
                ServerEvent::ShipData { layout },
            )],

            ClientMessage::ShipsRemaining { room_id, count } => vec![(
                Audience::room_except(&room_id, connection_id),
                ServerEvent::ShipsRemaining { count },
            )],

            // The coordinate goes to the opponent only; the turn handoff goes
            // to the whole room so both clients render the same turn state.
            ClientMessage::Attack {
                room_id,
                coordinate,
                next_turn,
            } => vec![
                (
                    Audience::room_except(&room_id, connection_id),
                    ServerEvent::EnemyClick { coordinate },
                ),
                (
                    Audience::room(&room_id),
                    ServerEvent::WhoseTurn {
                        username: next_turn,
                    },
                ),
            ],

            ClientMessage::GameOver { username, room_id } => vec![(
                Audience::room(&room_id),
                ServerEvent::Winner { username },
            )],

            ClientMessage::PlayerReady { room_id } => {
                vec![(Audience::room(&room_id), ServerEvent::StartGame)]
            }

            ClientMessage::UpdateList => vec![(Audience::all(), ServerEvent::GameListChanged)],
        }
    }

    fn departure_events(
        room_id: &str,
        notice: ServerEvent,
        players: Vec<String>,
        room_destroyed: bool,
    ) -> Vec<(Audience, ServerEvent)> {
        let mut deliveries = Vec::new();
        // A destroyed room has nobody left to notify.
        if !room_destroyed {
            deliveries.push((Audience::room(room_id), notice));
            deliveries.push((Audience::room(room_id), ServerEvent::PlayerList { players }));
        }
        deliveries.push((Audience::all(), ServerEvent::GameListChanged));
        deliveries
    }

    fn queue(
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
        deliveries: Vec<(Audience, ServerEvent)>,
    ) -> AppResult<()> {
        for (audience, event) in deliveries {
            let message = serialize_event(&event)?;
            cmd_sender
                .send(ConnectionCommand::Deliver { audience, message })
                .map_err(|e| AppError::WebSocketError {
                    message: format!("delivery channel closed: {}", e),
                })?;
        }
        Ok(())
    }
}
