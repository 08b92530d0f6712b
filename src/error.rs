//! Error types for hidden-groups
//!
//! This module defines the error hierarchy used throughout the crate.
//! The registry and the decision engine never surface these to the host
//! for expected bad input; only configuration loading and the command
//! wrappers report errors to their callers.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("ACL error: {0}")]
    Acl(#[from] AclError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Internal failures of the decision engine.
///
/// These are logged and converted to an abstain decision; they never
/// reach the permission pipeline.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("hidden group registry is not available")]
    RegistryUnavailable,

    #[error("hidden group lookup failed for '{username}': {reason}")]
    Lookup { username: String, reason: String },
}

/// Caller-facing failures of the add/remove command wrappers
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{field} cannot be empty")]
    InvalidArgument { field: &'static str },

    #[error("{command} failed: {reason}")]
    Failed {
        command: &'static str,
        reason: String,
    },
}

impl CommandError {
    pub fn blank(field: &'static str) -> Self {
        CommandError::InvalidArgument { field }
    }
}

/// Errors while loading a static ACL
#[derive(Error, Debug)]
pub enum AclError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid ACL document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid ACL entry #{index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for command wrappers
pub type CommandResult<T> = std::result::Result<T, CommandError>;
