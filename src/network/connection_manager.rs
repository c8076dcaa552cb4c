use futures_util::{stream::SplitSink, SinkExt};
use std::collections::HashMap;
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message, WebSocketStream};
use tracing::{debug, error};

use crate::{AppError, AppResult};

#[derive(Debug)]
struct WebSocketConnection {
    sender: SplitSink<WebSocketStream<TcpStream>, Message>,
}

/// Registry of live connections and their outbound sinks. Room membership is
/// tracked separately in the room store; this only knows how to reach a
/// connection.
pub struct ConnectionManager {
    connections: HashMap<String, WebSocketConnection>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    pub fn add_connection(
        &mut self,
        id: String,
        sender: SplitSink<WebSocketStream<TcpStream>, Message>,
    ) {
        debug!(connection_id = %id, "registered connection");
        self.connections.insert(id, WebSocketConnection { sender });
    }

    pub fn remove_connection(&mut self, id: &str) {
        debug!(connection_id = %id, "removed connection");
        self.connections.remove(id);
    }

    pub fn connection_ids(&self) -> Vec<String> {
        self.connections.keys().cloned().collect()
    }

    pub async fn send_to_connection(&mut self, connection_id: &str, message: &str) -> AppResult<()> {
        let connection =
            self.connections
                .get_mut(connection_id)
                .ok_or_else(|| AppError::ConnectionNotFound {
                    connection_id: connection_id.to_string(),
                })?;
        connection
            .sender
            .send(Message::Text(message.to_string()))
            .await
            .map_err(|_| AppError::MessageSendFailed {
                connection_id: connection_id.to_string(),
            })
    }

    /// Best-effort delivery to a resolved recipient list. Connections whose
    /// sink has gone away are dropped from the registry; their room cleanup
    /// happens when their reader task observes the close.
    pub async fn send_to_many(&mut self, recipients: &[String], message: &str) {
        let mut failed = Vec::new();
        for connection_id in recipients {
            if let Err(e) = self.send_to_connection(connection_id, message).await {
                if matches!(e, AppError::MessageSendFailed { .. }) {
                    error!(connection_id, error = %e, "dropping unreachable connection");
                    failed.push(connection_id.clone());
                }
            }
        }
        for connection_id in failed {
            self.remove_connection(&connection_id);
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
