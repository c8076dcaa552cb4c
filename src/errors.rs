use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Serialize, PartialEq)]
pub enum AppError {
    // Room-related errors
    #[error("Room '{room_id}' not found")]
    RoomNotFound { room_id: String },

    #[error("Room id '{room_id}' is already taken")]
    DuplicateRoomId { room_id: String },

    #[error("Room '{room_id}' is full (max: {capacity})")]
    RoomFull { room_id: String, capacity: usize },

    #[error("Connection is already in room '{room_id}'")]
    ConnectionAlreadyInRoom { room_id: String },

    #[error("Connection is not in any room")]
    ConnectionNotInRoom,

    // Connection-related errors
    #[error("Connection '{connection_id}' not found")]
    ConnectionNotFound { connection_id: String },

    #[error("Failed to send message to connection '{connection_id}'")]
    MessageSendFailed { connection_id: String },

    // Validation errors
    #[error("Invalid player name: {reason}")]
    InvalidPlayerName { reason: String },

    #[error("Invalid room name: {reason}")]
    InvalidRoomName { reason: String },

    #[error("Room name cannot be empty")]
    RoomNameEmpty,

    // Serialization errors
    #[error("Failed to serialize response: {message}")]
    SerializationError { message: String },

    #[error("WebSocket error: {message}")]
    WebSocketError { message: String },

    #[error("Unknown message: {message}")]
    UnknownMessage { message: String },
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy)]
pub enum ErrorCategory {
    ClientError,
    ServerError,
    ValidationError,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::RoomNotFound { .. }
            | AppError::DuplicateRoomId { .. }
            | AppError::RoomFull { .. }
            | AppError::ConnectionAlreadyInRoom { .. }
            | AppError::ConnectionNotInRoom
            | AppError::UnknownMessage { .. } => ErrorCategory::ClientError,

            AppError::InvalidPlayerName { .. }
            | AppError::InvalidRoomName { .. }
            | AppError::RoomNameEmpty => ErrorCategory::ValidationError,

            AppError::ConnectionNotFound { .. }
            | AppError::MessageSendFailed { .. }
            | AppError::SerializationError { .. }
            | AppError::WebSocketError { .. } => ErrorCategory::ServerError,
        }
    }

    pub fn should_log(&self) -> bool {
        matches!(self.category(), ErrorCategory::ServerError)
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::RoomFull { capacity, .. } => {
                format!("Room is full (maximum {} players)", capacity)
            }
            AppError::RoomNotFound { .. } => {
                "The room you're looking for doesn't exist".to_string()
            }
            AppError::DuplicateRoomId { .. } => "That room name is already taken".to_string(),
            AppError::ConnectionAlreadyInRoom { .. } => {
                "You need to leave your current room first".to_string()
            }
            AppError::ConnectionNotInRoom => "You need to join a room first".to_string(),
            AppError::SerializationError { .. } | AppError::UnknownMessage { .. } => {
                "Invalid message format".to_string()
            }
            _ => self.to_string(),
        }
    }
}

pub mod validation {
    use super::AppError;

    pub fn validate_player_name(name: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidPlayerName {
                reason: "Player name cannot be empty".to_string(),
            });
        }
        if name.len() > 50 {
            return Err(AppError::InvalidPlayerName {
                reason: "Player name cannot exceed 50 characters".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_room_name(name: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::RoomNameEmpty);
        }
        if name.len() > 100 {
            return Err(AppError::InvalidRoomName {
                reason: "Room name cannot exceed 100 characters".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_full_is_a_client_error() {
        let err = AppError::RoomFull {
            room_id: "abc".to_string(),
            capacity: 2,
        };
        assert!(matches!(err.category(), ErrorCategory::ClientError));
        assert!(!err.should_log());
    }

    #[test]
    fn send_failure_is_logged() {
        let err = AppError::MessageSendFailed {
            connection_id: "conn1".to_string(),
        };
        assert!(err.should_log());
    }

    #[test]
    fn unknown_message_hides_parser_detail_from_client() {
        let err = AppError::UnknownMessage {
            message: "expected value at line 1 column 1".to_string(),
        };
        assert!(matches!(err.category(), ErrorCategory::ClientError));
        assert_eq!(err.user_friendly_message(), "Invalid message format");
    }

    #[test]
    fn validates_player_name() {
        assert!(validation::validate_player_name("Alice").is_ok());
        assert!(validation::validate_player_name("  ").is_err());
        assert!(validation::validate_player_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn validates_room_name() {
        assert!(validation::validate_room_name("abc").is_ok());
        assert_eq!(
            validation::validate_room_name(""),
            Err(AppError::RoomNameEmpty)
        );
    }
}
