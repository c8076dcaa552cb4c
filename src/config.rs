use std::env;

const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: String,
    /// Lobby rooms created at startup that survive becoming empty.
    pub permanent_rooms: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let address = env::var("BATTLESHIP_ADDR").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());
        let permanent_rooms = env::var("BATTLESHIP_LOBBIES")
            .map(|raw| Self::parse_room_list(&raw))
            .unwrap_or_default();
        Self {
            address,
            permanent_rooms,
        }
    }

    fn parse_room_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            permanent_rooms: Vec::new(),
        }
    }
}
