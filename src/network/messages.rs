use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::relay::RoomListing;
use crate::AppError;

/// Inbound wire messages: `{"event": "...", "data": {...}}`. Event names
/// match what the Battleship client emits. Game payloads (ship layouts,
/// attack coordinates) stay opaque `Value`s; the server never inspects them.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "get-game-list")]
    GetGameList,
    #[serde(rename = "check-room")]
    CheckRoom { room_id: String },
    #[serde(rename = "player:joined")]
    JoinRoom { username: String, room_id: String },
    #[serde(rename = "player:left")]
    LeaveRoom { username: String, room_id: String },
    #[serde(rename = "chat:message")]
    Chat {
        room_id: String,
        username: String,
        text: String,
    },
    #[serde(rename = "ship-data")]
    ShipData { room_id: String, layout: Value },
    #[serde(rename = "ships-remaining")]
    ShipsRemaining { room_id: String, count: u32 },
    #[serde(rename = "click-data-hit")]
    Attack {
        room_id: String,
        coordinate: Value,
        next_turn: String,
    },
    #[serde(rename = "game-over")]
    GameOver { username: String, room_id: String },
    #[serde(rename = "player-ready")]
    PlayerReady { room_id: String },
    #[serde(rename = "update-list")]
    UpdateList,
}

/// Outbound wire events. Callback-style replies (`game-list`,
/// `room-available`, `join-result`) go only to the requesting connection.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "connection-id")]
    ConnectionId { connection_id: String },
    #[serde(rename = "game-list")]
    GameList { games: Vec<RoomListing> },
    #[serde(rename = "room-available")]
    RoomAvailable { success: bool },
    #[serde(rename = "join-result")]
    JoinResult {
        success: bool,
        room_name: Option<String>,
        players: Vec<String>,
        message: Option<String>,
    },
    #[serde(rename = "player:joined")]
    PlayerJoined { username: String },
    #[serde(rename = "player:left")]
    PlayerLeft { username: String },
    #[serde(rename = "player:disconnected")]
    PlayerDisconnected { username: String },
    #[serde(rename = "player:list")]
    PlayerList { players: Vec<String> },
    #[serde(rename = "new-game-list")]
    GameListChanged,
    #[serde(rename = "chat:message")]
    Chat { username: String, text: String },
    #[serde(rename = "get-ship-data")]
    ShipData { layout: Value },
    #[serde(rename = "get-ships-remaining")]
    ShipsRemaining { count: u32 },
    #[serde(rename = "get-enemy-click")]
    EnemyClick { coordinate: Value },
    #[serde(rename = "get-whose-turn")]
    WhoseTurn { username: String },
    #[serde(rename = "winner")]
    Winner { username: String },
    #[serde(rename = "start-game")]
    StartGame,
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerEvent {
    pub fn join_success(room_name: &str, players: Vec<String>) -> Self {
        ServerEvent::JoinResult {
            success: true,
            room_name: Some(room_name.to_string()),
            players,
            message: None,
        }
    }

    pub fn join_failure(error: &AppError) -> Self {
        ServerEvent::JoinResult {
            success: false,
            room_name: None,
            players: Vec::new(),
            message: Some(error.user_friendly_message()),
        }
    }
}

pub fn deserialize_message(json: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn serialize_event(event: &ServerEvent) -> Result<String, AppError> {
    serde_json::to_string(event).map_err(|e| AppError::SerializationError {
        message: e.to_string(),
    })
}
