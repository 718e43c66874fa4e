//! Error handling for the auction client

use std::fmt;
use thiserror::Error;

/// Unified error type for the auction client
#[derive(Error, Debug)]
pub enum Error {
    /// Local pre-checks failed, or the identity provider rejected a sign-up payload
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid credentials, or a malformed handshake response
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-success HTTP status from the remote API
    #[error("{message} (Status: {status})")]
    Remote {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Success status, but the payload could not be shaped into the expected type
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Session store I/O errors
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl Error {
    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new remote error
    pub fn remote<T: fmt::Display>(status: reqwest::StatusCode, msg: T) -> Self {
        Error::Remote {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new malformed response error
    pub fn malformed<T: fmt::Display>(msg: T) -> Self {
        Error::MalformedResponse(msg.to_string())
    }

    /// The message to show the user for this error.
    ///
    /// Remote, validation and auth errors carry a message meant for display as-is;
    /// transport failures fall back to their `Display` form.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) | Error::Auth(msg) | Error::MalformedResponse(msg) => {
                msg.clone()
            }
            Error::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
