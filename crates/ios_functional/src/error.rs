//! Error types for remote automation commands

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Session not created: {0}")]
    SessionNotCreated(String),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Remote command failed ({error}): {message}")]
    Command { error: String, message: String },

    #[error("Command timeout: {0}")]
    Timeout(String),

    #[error("Unexpected response: {0}")]
    Protocol(String),

    #[error("Unknown app: {0}")]
    UnknownApp(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}

impl DriverError {
    /// Build an error from a remote error envelope, mapping the W3C
    /// `no such element` code onto its own variant.
    pub fn from_remote(error: impl Into<String>, message: impl Into<String>) -> Self {
        let error = error.into();
        let message = message.into();
        if error == "no such element" {
            DriverError::NoSuchElement(message)
        } else {
            DriverError::Command { error, message }
        }
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_remote_no_such_element() {
        let err = DriverError::from_remote("no such element", "Sliders");
        assert!(matches!(err, DriverError::NoSuchElement(ref m) if m == "Sliders"));
    }

    #[test]
    fn test_from_remote_generic() {
        let err = DriverError::from_remote("invalid element state", "locked");
        assert_eq!(
            err.to_string(),
            "Remote command failed (invalid element state): locked"
        );
    }
}
