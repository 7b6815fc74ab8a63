use std::io;
use thiserror::Error;

/// Custom result type for Corral operations
pub type CorralResult<T> = Result<T, CorralError>;

/// Custom error type for Corral operations
#[derive(Debug, Error)]
pub enum CorralError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CorralError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CorralError::Config(msg.into())
    }

    /// Create a new command error
    pub fn command<S: Into<String>>(msg: S) -> Self {
        CorralError::Command(msg.into())
    }

    /// Create a new environment error
    pub fn environment<S: Into<String>>(msg: S) -> Self {
        CorralError::Environment(msg.into())
    }
}

impl From<io::Error> for CorralError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for CorralError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for CorralError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
