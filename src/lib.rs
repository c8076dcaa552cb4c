pub mod config;
pub mod errors;
pub mod network;
pub mod relay;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use errors::{AppError, AppResult};
pub use relay::{Room, RoomManager, RoomStore};
