use tracing::{info, warn};

use crate::errors::validation;
use crate::relay::room::RoomListing;
use crate::relay::room_store::RoomStore;
use crate::{AppError, AppResult};

/// Drives room lifecycle: join (create-on-first-join), leave, disconnect and
/// the joinable listing. Owns the `RoomStore`; all mutations go through here.
pub struct RoomManager {
    store: RoomStore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub room_id: String,
    pub room_name: String,
    pub username: String,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    pub room_id: String,
    pub username: String,
    /// Members remaining after the removal, in join order.
    pub players: Vec<String>,
    pub room_destroyed: bool,
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            store: RoomStore::new(),
        }
    }

    /// Pre-seeds permanent lobby rooms at startup. These survive becoming
    /// empty, unlike rooms created on first join.
    pub fn seed_permanent_rooms(&mut self, room_ids: &[String]) {
        for room_id in room_ids {
            match self.store.create(room_id, room_id, true) {
                Ok(_) => info!(room_id, "seeded permanent room"),
                Err(e) => warn!(room_id, error = %e, "skipping permanent room seed"),
            }
        }
    }

    pub fn store(&self) -> &RoomStore {
        &self.store
    }

    /// Adds the connection to the room, creating the room if the id is
    /// unknown. Rejects a third player and a connection already seated in
    /// some room.
    pub fn join(
        &mut self,
        connection_id: &str,
        username: &str,
        room_id: &str,
    ) -> AppResult<JoinOutcome> {
        validation::validate_player_name(username)?;
        validation::validate_room_name(room_id)?;

        if let Some(current) = self.store.find_by_connection(connection_id) {
            return Err(AppError::ConnectionAlreadyInRoom {
                room_id: current.id().to_string(),
            });
        }

        if self.store.find(room_id).is_none() {
            self.store.create(room_id, room_id, false)?;
            info!(room_id, "created room on first join");
        }

        let room = self
            .store
            .find_mut(room_id)
            .ok_or_else(|| AppError::RoomNotFound {
                room_id: room_id.to_string(),
            })?;
        room.add_member(connection_id, username)?;

        info!(room_id, username, connection_id, "player joined room");
        Ok(JoinOutcome {
            room_id: room.id().to_string(),
            room_name: room.display_name().to_string(),
            username: username.to_string(),
            players: room.usernames(),
        })
    }

    /// Removes the connection from the room and destroys the room if it ends
    /// up empty and non-permanent. The removal, the empty check and the
    /// destruction are one synchronous block, so no other event can observe
    /// an empty ad hoc room in between.
    pub fn leave(&mut self, connection_id: &str, room_id: &str) -> AppResult<LeaveOutcome> {
        let Some(room) = self.store.find_mut(room_id) else {
            warn!(room_id, connection_id, "leave for unknown room, dropping");
            return Err(AppError::RoomNotFound {
                room_id: room_id.to_string(),
            });
        };

        let Some(username) = room.remove_member(connection_id) else {
            warn!(room_id, connection_id, "leave from a room the connection is not in");
            return Err(AppError::ConnectionNotInRoom);
        };

        let players = room.usernames();
        let room_destroyed = self.store.remove_if_empty(room_id);
        info!(room_id, username, room_destroyed, "player left room");

        Ok(LeaveOutcome {
            room_id: room_id.to_string(),
            username,
            players,
            room_destroyed,
        })
    }

    /// Disconnect behaves like `leave` against whichever room currently holds
    /// the connection. A connection that never joined a room is a no-op.
    pub fn disconnect(&mut self, connection_id: &str) -> Option<LeaveOutcome> {
        let room_id = self
            .store
            .find_by_connection(connection_id)?
            .id()
            .to_string();
        self.leave(connection_id, &room_id).ok()
    }

    /// True iff no room with that id currently exists, so a client can claim
    /// a fresh id before joining.
    pub fn check_availability(&self, room_id: &str) -> bool {
        !self.store.contains(room_id)
    }

    pub fn list_joinable(&self) -> Vec<RoomListing> {
        self.store.list_joinable()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}
