pub mod commands;
pub mod connection;
pub mod connection_manager;
pub mod handler;
pub mod lobby;
pub mod messages;
pub mod server;

pub use commands::{CommandProcessor, ConnectionCommand};
pub use connection::ConnectionHandler;
pub use connection_manager::ConnectionManager;
pub use handler::MessageHandler;
pub use lobby::LobbyState;
pub use server::WebsocketServer;
