pub mod engine;
pub mod room;
pub mod room_manager;
pub mod room_store;

pub use engine::{Audience, RelayEngine};
pub use room::{Room, RoomListing, ROOM_CAPACITY};
pub use room_manager::{JoinOutcome, LeaveOutcome, RoomManager};
pub use room_store::RoomStore;
