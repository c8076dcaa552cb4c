use tracing::warn;

use crate::relay::room_store::RoomStore;

/// Where an outbound event should go. Payloads are opaque to the relay; only
/// the address is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum Audience {
    /// A single connection (callback-style responses).
    Connection(String),
    /// Every member of a room, minus an optional sender.
    Room {
        room_id: String,
        except: Option<String>,
    },
    /// Every live connection, minus an optional sender. Used for
    /// listing-changed signals.
    All { except: Option<String> },
}

impl Audience {
    pub fn connection(connection_id: &str) -> Self {
        Audience::Connection(connection_id.to_string())
    }

    pub fn room(room_id: &str) -> Self {
        Audience::Room {
            room_id: room_id.to_string(),
            except: None,
        }
    }

    pub fn room_except(room_id: &str, sender: &str) -> Self {
        Audience::Room {
            room_id: room_id.to_string(),
            except: Some(sender.to_string()),
        }
    }

    pub fn all() -> Self {
        Audience::All { except: None }
    }

    pub fn all_except(sender: &str) -> Self {
        Audience::All {
            except: Some(sender.to_string()),
        }
    }
}

/// Resolves an `Audience` into concrete connection ids. Reads room membership
/// through the store only; never mutates it.
pub struct RelayEngine;

impl RelayEngine {
    pub fn resolve(
        store: &RoomStore,
        live_connections: &[String],
        audience: &Audience,
    ) -> Vec<String> {
        match audience {
            Audience::Connection(connection_id) => vec![connection_id.clone()],
            Audience::Room { room_id, except } => {
                let Some(room) = store.find(room_id) else {
                    // Client referenced a room the server no longer knows
                    // about. The event is dropped.
                    warn!(room_id, "relay to unknown room, dropping event");
                    return Vec::new();
                };
                room.member_connection_ids()
                    .into_iter()
                    .filter(|id| Some(id) != except.as_ref())
                    .collect()
            }
            Audience::All { except } => live_connections
                .iter()
                .filter(|id| Some(*id) != except.as_ref())
                .cloned()
                .collect(),
        }
    }
}
