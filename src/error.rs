//! Error handling module for scriptdeck
//!
//! Provides centralized error types using thiserror. Navigation paths degrade
//! to empty/default results instead of returning these; they surface only from
//! persistence (which callers may ignore) and from explicit user actions.

use thiserror::Error;

/// Main error type for scriptdeck
#[derive(Error, Debug)]
pub enum DeckError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration document errors (persisting, resolving paths)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The state document (recent/favorites) could not be written
    #[error("State error: {0}")]
    State(String),

    /// A script, editor or file manager could not be started
    #[error("Launch failed: {0}")]
    Launch(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Result type alias for scriptdeck operations
pub type Result<T> = std::result::Result<T, DeckError>;

impl DeckError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create a launch error
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }
}
