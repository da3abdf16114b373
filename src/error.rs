//! Client Error Types
//!
//! Defines the error taxonomy for the task client. Each variant maps to a
//! distinct failure class the caller can react to: validation failures are
//! caught before any network call, rejected credentials are shown inline,
//! an authorization-denied response forces a logout, and connectivity
//! problems leave all session state untouched.

use thiserror::Error;

/// Errors surfaced by the task client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Input rejected before any network call was made
    #[error("validation error: {0}")]
    Validation(String),

    /// The authentication endpoint rejected the credential pair
    #[error("invalid email or password")]
    InvalidCredentials,

    /// An operation requiring a session was called without one
    #[error("not authenticated")]
    NotAuthenticated,

    /// The server answered an authenticated call with 403.
    /// The session has already been cleared when this is returned.
    #[error("access denied")]
    Forbidden,

    /// The request timed out before a response arrived
    #[error("request timeout")]
    Timeout,

    /// No connection to the server could be established
    #[error("server unavailable")]
    Unavailable,

    /// The server answered with an unexpected error status
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure not otherwise classified
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The durable session file could not be read or written
    #[error("session storage error: {0}")]
    Session(#[from] crate::session::SessionError),
}

impl ClientError {
    /// Classify a transport error into the taxonomy.
    ///
    /// Timeouts and refused connections are distinguishable from other
    /// request failures so the caller can show a connectivity message.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout
        } else if error.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Transport(error)
        }
    }

    /// Whether this error indicates the session was rejected by the server
    pub fn is_auth_denied(&self) -> bool {
        matches!(self, ClientError::Forbidden)
    }

    /// Whether no response was received at all
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Timeout | ClientError::Unavailable)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ClientError::Validation("passwords do not match".to_string());
        assert_eq!(err.to_string(), "validation error: passwords do not match");

        let err = ClientError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "api error 500: boom");
    }

    #[test]
    fn test_error_classification() {
        assert!(ClientError::Forbidden.is_auth_denied());
        assert!(!ClientError::InvalidCredentials.is_auth_denied());

        assert!(ClientError::Timeout.is_connectivity());
        assert!(ClientError::Unavailable.is_connectivity());
        assert!(!ClientError::Forbidden.is_connectivity());
    }
}
