use futures_util::stream::SplitSink;
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message, WebSocketStream};

use crate::network::lobby::LobbyState;
use crate::relay::{Audience, RelayEngine};

/// Commands consumed by the single delivery task. All outbound traffic funnels
/// through one FIFO channel, so two events queued by the same handler are
/// never reordered toward a recipient.
#[derive(Debug)]
pub enum ConnectionCommand {
    AddConnection {
        id: String,
        sender: SplitSink<WebSocketStream<TcpStream>, Message>,
    },
    RemoveConnection {
        id: String,
    },
    Deliver {
        audience: Audience,
        message: String,
    },
}

pub struct CommandProcessor;

impl CommandProcessor {
    pub async fn process_command(command: ConnectionCommand, state: &mut LobbyState) {
        match command {
            ConnectionCommand::AddConnection { id, sender } => {
                state.connection_manager.add_connection(id, sender);
            }
            ConnectionCommand::RemoveConnection { id } => {
                state.connection_manager.remove_connection(&id);
            }
            ConnectionCommand::Deliver { audience, message } => {
                let live = state.connection_manager.connection_ids();
                let recipients =
                    RelayEngine::resolve(state.room_manager.store(), &live, &audience);
                state
                    .connection_manager
                    .send_to_many(&recipients, &message)
                    .await;
            }
        }
    }
}
