use crate::network::connection_manager::ConnectionManager;
use crate::relay::RoomManager;

/// All shared server state, guarded by one mutex. Handlers must finish every
/// multi-step room mutation before yielding, so no event can observe a
/// half-updated store.
pub struct LobbyState {
    pub room_manager: RoomManager,
    pub connection_manager: ConnectionManager,
}

impl LobbyState {
    pub fn new() -> Self {
        Self {
            room_manager: RoomManager::new(),
            connection_manager: ConnectionManager::new(),
        }
    }
}

impl Default for LobbyState {
    fn default() -> Self {
        Self::new()
    }
}
