//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Error reported by the backend; the message is kept verbatim.
    #[error("{message}")]
    Backend {
        code: u16,
        kind: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn backend(code: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            code,
            kind: None,
            message: message.into(),
        }
    }
}
