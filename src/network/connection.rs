use futures_util::StreamExt;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{error, info};

use crate::network::commands::ConnectionCommand;
use crate::network::handler::MessageHandler;
use crate::network::lobby::LobbyState;
use crate::network::messages::{serialize_event, ServerEvent};
use crate::relay::Audience;
use crate::{AppError, AppResult};

pub struct ConnectionHandler;

impl ConnectionHandler {
    pub async fn handle_connection(
        stream: TcpStream,
        connection_id: String,
        lobby_state: Arc<Mutex<LobbyState>>,
        cmd_sender: mpsc::UnboundedSender<ConnectionCommand>,
    ) -> AppResult<()> {
        let ws_stream = accept_async(stream)
            .await
            .map_err(|e| AppError::WebSocketError {
                message: e.to_string(),
            })?;
        info!(connection_id, "websocket connection established");

        let (ws_sender, mut ws_receiver) = ws_stream.split();

        Self::send_command(
            &cmd_sender,
            ConnectionCommand::AddConnection {
                id: connection_id.clone(),
                sender: ws_sender,
            },
        )?;

        // Tell the client who it is before anything else.
        let hello = serialize_event(&ServerEvent::ConnectionId {
            connection_id: connection_id.clone(),
        })?;
        Self::send_command(
            &cmd_sender,
            ConnectionCommand::Deliver {
                audience: Audience::connection(&connection_id),
                message: hello,
            },
        )?;

        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(e) = MessageHandler::handle_text_message(
                        &text,
                        &connection_id,
                        &lobby_state,
                        &cmd_sender,
                    )
                    .await
                    {
                        error!(connection_id, error = %e, "failed to handle message");
                    }
                }
                Ok(Message::Close(_)) => {
                    info!(connection_id, "client requested close");
                    break;
                }
                Ok(_) => {
                    // Binary/ping/pong frames carry nothing for the relay.
                }
                Err(e) => {
                    info!(connection_id, error = %e, "connection dropped");
                    break;
                }
            }
        }

        // Room cleanup first, then the sink goes away. The departure
        // notifications are queued before RemoveConnection, so remaining
        // peers still receive them.
        MessageHandler::handle_disconnect(&connection_id, &lobby_state, &cmd_sender).await?;
        Self::send_command(
            &cmd_sender,
            ConnectionCommand::RemoveConnection {
                id: connection_id.clone(),
            },
        )?;

        info!(connection_id, "connection closed");
        Ok(())
    }

    fn send_command(
        cmd_sender: &mpsc::UnboundedSender<ConnectionCommand>,
        command: ConnectionCommand,
    ) -> AppResult<()> {
        cmd_sender
            .send(command)
            .map_err(|e| AppError::WebSocketError {
                message: format!("command channel closed: {}", e),
            })
    }
}
