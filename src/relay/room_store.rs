use tracing::error;

use crate::relay::room::{Room, RoomListing};
use crate::{AppError, AppResult};

/// Owns every live room. Rooms stay in creation order so listings are stable.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: Vec<Room>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self { rooms: Vec::new() }
    }

    pub fn find(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id() == room_id)
    }

    pub fn find_mut(&mut self, room_id: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id() == room_id)
    }

    pub fn contains(&self, room_id: &str) -> bool {
        self.find(room_id).is_some()
    }

    /// A connection belongs to at most one room. More than one match is an
    /// invariant violation; the first room found is treated as authoritative.
    pub fn find_by_connection(&self, connection_id: &str) -> Option<&Room> {
        let mut matches = self.rooms.iter().filter(|r| r.contains(connection_id));
        let first = matches.next();
        if let Some(room) = first {
            if let Some(other) = matches.next() {
                error!(
                    connection_id,
                    first_room = room.id(),
                    other_room = other.id(),
                    "connection found in more than one room, using first"
                );
            }
        }
        first
    }

    pub fn create(&mut self, id: &str, display_name: &str, permanent: bool) -> AppResult<&mut Room> {
        if self.contains(id) {
            return Err(AppError::DuplicateRoomId {
                room_id: id.to_string(),
            });
        }
        self.rooms.push(Room::new(id, display_name, permanent));
        let last = self.rooms.len() - 1;
        Ok(&mut self.rooms[last])
    }

    /// Snapshot of rooms that still have a free seat, in creation order.
    pub fn list_joinable(&self) -> Vec<RoomListing> {
        self.rooms
            .iter()
            .filter(|r| !r.is_full())
            .map(Room::listing)
            .collect()
    }

    /// Removes the room iff it is empty and not permanent. Must run
    /// immediately after every member removal.
    pub fn remove_if_empty(&mut self, room_id: &str) -> bool {
        let Some(index) = self.rooms.iter().position(|r| r.id() == room_id) else {
            return false;
        };
        if self.rooms[index].is_permanent() || !self.rooms[index].is_empty() {
            return false;
        }
        self.rooms.remove(index);
        true
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_room(id: &str) -> RoomStore {
        let mut store = RoomStore::new();
        store.create(id, id, false).unwrap();
        store
    }

    #[test]
    fn create_rejects_duplicate_ids() {
        let mut store = store_with_room("abc");

        let result = store.create("abc", "abc", false);
        assert_eq!(
            result.err(),
            Some(AppError::DuplicateRoomId {
                room_id: "abc".to_string()
            })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn find_is_exact_match() {
        let store = store_with_room("abc");

        assert!(store.find("abc").is_some());
        assert!(store.find("ab").is_none());
        assert!(store.find("ABC").is_none());
    }

    #[test]
    fn find_by_connection_returns_membership() {
        let mut store = store_with_room("abc");
        store.create("xyz", "xyz", false).unwrap();
        store
            .find_mut("xyz")
            .unwrap()
            .add_member("conn1", "Alice")
            .unwrap();

        assert_eq!(store.find_by_connection("conn1").unwrap().id(), "xyz");
        assert!(store.find_by_connection("conn2").is_none());
    }

    #[test]
    fn find_by_connection_treats_first_room_as_authoritative() {
        // Membership in two rooms is a bug elsewhere; the lookup must still
        // return something sensible instead of crashing.
        let mut store = RoomStore::new();
        store.create("first", "first", false).unwrap();
        store.create("second", "second", false).unwrap();
        store
            .find_mut("first")
            .unwrap()
            .add_member("conn1", "Alice")
            .unwrap();
        store
            .find_mut("second")
            .unwrap()
            .add_member("conn1", "Alice")
            .unwrap();

        assert_eq!(store.find_by_connection("conn1").unwrap().id(), "first");
    }

    #[test]
    fn list_joinable_hides_full_rooms_and_keeps_order() {
        let mut store = RoomStore::new();
        store.create("first", "first", false).unwrap();
        store.create("second", "second", false).unwrap();
        store.create("third", "third", false).unwrap();

        let room = store.find_mut("second").unwrap();
        room.add_member("conn1", "Alice").unwrap();
        room.add_member("conn2", "Bob").unwrap();

        let ids: Vec<String> = store.list_joinable().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["first", "third"]);
    }

    #[test]
    fn list_joinable_is_a_snapshot() {
        let mut store = store_with_room("abc");

        let listings = store.list_joinable();
        store
            .find_mut("abc")
            .unwrap()
            .add_member("conn1", "Alice")
            .unwrap();

        // The earlier snapshot is unaffected by the mutation.
        assert!(listings[0].members.is_empty());
    }

    #[test]
    fn remove_if_empty_destroys_only_empty_ad_hoc_rooms() {
        let mut store = RoomStore::new();
        store.create("adhoc", "adhoc", false).unwrap();
        store.create("lobby", "lobby", true).unwrap();
        store.create("occupied", "occupied", false).unwrap();
        store
            .find_mut("occupied")
            .unwrap()
            .add_member("conn1", "Alice")
            .unwrap();

        assert!(store.remove_if_empty("adhoc"));
        assert!(!store.remove_if_empty("lobby"));
        assert!(!store.remove_if_empty("occupied"));
        assert!(!store.remove_if_empty("missing"));

        assert!(!store.contains("adhoc"));
        assert!(store.contains("lobby"));
        assert!(store.contains("occupied"));
    }
}
