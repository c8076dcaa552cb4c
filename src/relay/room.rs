use serde::Serialize;

use crate::{AppError, AppResult};

/// Hard player cap per room. Listings already hide full rooms, but a third
/// join is rejected outright instead of silently overfilling the room.
pub const ROOM_CAPACITY: usize = 2;

#[derive(Debug, Clone, PartialEq)]
struct Member {
    connection_id: String,
    username: String,
}

/// A named pairing of at most two connections playing one game together.
///
/// Membership preserves join order. Rooms are owned by the `RoomStore`;
/// nothing else holds a copy.
#[derive(Debug, Clone)]
pub struct Room {
    id: String,
    display_name: String,
    permanent: bool,
    members: Vec<Member>,
}

/// Fixed projection of a room for listings, independent of internal shape.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoomListing {
    pub id: String,
    pub display_name: String,
    pub members: Vec<String>,
}

impl Room {
    pub fn new(id: &str, display_name: &str, permanent: bool) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            permanent,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_permanent(&self) -> bool {
        self.permanent
    }

    pub fn add_member(&mut self, connection_id: &str, username: &str) -> AppResult<()> {
        if self.members.len() >= ROOM_CAPACITY {
            return Err(AppError::RoomFull {
                room_id: self.id.clone(),
                capacity: ROOM_CAPACITY,
            });
        }
        // A connection cannot occupy two seats in the same room.
        if self.contains(connection_id) {
            return Err(AppError::ConnectionAlreadyInRoom {
                room_id: self.id.clone(),
            });
        }
        self.members.push(Member {
            connection_id: connection_id.to_string(),
            username: username.to_string(),
        });
        Ok(())
    }

    /// Removes the member and returns their username, or `None` if the
    /// connection was not in this room.
    pub fn remove_member(&mut self, connection_id: &str) -> Option<String> {
        let index = self
            .members
            .iter()
            .position(|m| m.connection_id == connection_id)?;
        Some(self.members.remove(index).username)
    }

    pub fn contains(&self, connection_id: &str) -> bool {
        self.members
            .iter()
            .any(|m| m.connection_id == connection_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub fn member_connection_ids(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| m.connection_id.clone())
            .collect()
    }

    /// Usernames in join order.
    pub fn usernames(&self) -> Vec<String> {
        self.members.iter().map(|m| m.username.clone()).collect()
    }

    pub fn listing(&self) -> RoomListing {
        RoomListing {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            members: self.usernames(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_keep_join_order() {
        let mut room = Room::new("abc", "abc", false);
        room.add_member("conn1", "Alice").unwrap();
        room.add_member("conn2", "Bob").unwrap();

        assert_eq!(room.usernames(), vec!["Alice", "Bob"]);
    }

    #[test]
    fn third_join_is_rejected() {
        let mut room = Room::new("abc", "abc", false);
        room.add_member("conn1", "Alice").unwrap();
        room.add_member("conn2", "Bob").unwrap();

        let result = room.add_member("conn3", "Carol");
        assert_eq!(
            result,
            Err(AppError::RoomFull {
                room_id: "abc".to_string(),
                capacity: 2,
            })
        );
        assert_eq!(room.member_count(), 2);
    }

    #[test]
    fn duplicate_connection_is_rejected() {
        let mut room = Room::new("abc", "abc", false);
        room.add_member("conn1", "Alice").unwrap();

        let result = room.add_member("conn1", "Alice");
        assert!(result.is_err());
        assert_eq!(room.member_count(), 1);
    }

    #[test]
    fn remove_member_returns_username() {
        let mut room = Room::new("abc", "abc", false);
        room.add_member("conn1", "Alice").unwrap();

        assert_eq!(room.remove_member("conn1"), Some("Alice".to_string()));
        assert!(room.is_empty());
        assert_eq!(room.remove_member("conn1"), None);
    }

    #[test]
    fn listing_projects_id_name_and_members() {
        let mut room = Room::new("abc", "Lobby One", true);
        room.add_member("conn1", "Alice").unwrap();

        let listing = room.listing();
        assert_eq!(listing.id, "abc");
        assert_eq!(listing.display_name, "Lobby One");
        assert_eq!(listing.members, vec!["Alice"]);
    }
}
