use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{mpsc, Mutex},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::network::commands::{CommandProcessor, ConnectionCommand};
use crate::network::connection::ConnectionHandler;
use crate::network::lobby::LobbyState;
use crate::AppError;

pub struct WebsocketServer {
    config: ServerConfig,
}

impl WebsocketServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let listener =
            TcpListener::bind(&self.config.address)
                .await
                .map_err(|e| AppError::WebSocketError {
                    message: format!("failed to bind {}: {}", self.config.address, e),
                })?;
        info!(address = %self.config.address, "listening");

        let mut lobby = LobbyState::new();
        lobby
            .room_manager
            .seed_permanent_rooms(&self.config.permanent_rooms);
        let lobby_state = Arc::new(Mutex::new(lobby));

        // Single delivery task: all outbound traffic is processed in the
        // order it was queued.
        let (cmd_sender, mut cmd_receiver) = mpsc::unbounded_channel::<ConnectionCommand>();
        let lobby_state_clone = lobby_state.clone();
        tokio::spawn(async move {
            while let Some(command) = cmd_receiver.recv().await {
                let mut state = lobby_state_clone.lock().await;
                CommandProcessor::process_command(command, &mut state).await;
            }
        });

        while let Ok((stream, addr)) = listener.accept().await {
            let connection_id = Uuid::new_v4().to_string();
            info!(%addr, connection_id, "new connection");

            let lobby_state = lobby_state.clone();
            let cmd_sender = cmd_sender.clone();

            tokio::spawn(async move {
                if let Err(e) = ConnectionHandler::handle_connection(
                    stream,
                    connection_id.clone(),
                    lobby_state,
                    cmd_sender,
                )
                .await
                {
                    error!(connection_id, error = %e, "connection handler failed");
                }
            });
        }

        Ok(())
    }
}
