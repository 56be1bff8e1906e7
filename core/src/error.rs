//! Structured error types for autoctl
//!
//! Local misuse (no session, empty command) is an error value; network
//! outcomes are not errors here, they come back as an `OperationResult`.

use thiserror::Error;

/// Primary error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    // =========================================================================
    // Precondition Errors (detected before any network I/O)
    // =========================================================================
    /// No session has been started yet
    #[error("no active session")]
    NoActiveSession,

    /// The submitted command was empty
    #[error("empty command")]
    EmptyCommand,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    // =========================================================================
    // External Error Wrappers
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl ClientError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::NoActiveSession => "Please start a session first".to_string(),
            Self::EmptyCommand => "Please enter a command".to_string(),
            _ => self.to_string(),
        }
    }

    /// Check if the error was raised locally, before any network call
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NoActiveSession | Self::EmptyCommand)
    }
}

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ClientError::NoActiveSession.user_message(),
            "Please start a session first"
        );
        assert_eq!(
            ClientError::EmptyCommand.user_message(),
            "Please enter a command"
        );

        let err = ClientError::InvalidConfig {
            message: "bad url".to_string(),
        };
        assert!(err.user_message().contains("bad url"));
    }

    #[test]
    fn test_precondition_classification() {
        assert!(ClientError::NoActiveSession.is_precondition());
        assert!(ClientError::EmptyCommand.is_precondition());
        assert!(!ClientError::Http("boom".to_string()).is_precondition());
    }
}
