//! Configuration management for sprintbook.
//!
//! This module owns the credential store: loading, prompting for, and
//! clearing the four fields (email, API token, base URL, board ID) that
//! every report flow needs before it can talk to Jira.

mod credentials;

use thiserror::Error;

pub use credentials::{Credentials, StoredCredentials};

/// Errors that can occur while managing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    /// The config directory could not be created.
    #[error("failed to create the configuration directory: {0}")]
    CreateDir(std::io::Error),

    /// The credentials file could not be read.
    #[error("failed to read the credentials file: {0}")]
    Read(std::io::Error),

    /// The credentials file could not be written.
    #[error("failed to write the credentials file: {0}")]
    Write(std::io::Error),

    /// The credentials file is not valid TOML.
    #[error("credentials file is invalid: {0}")]
    Parse(#[from] toml::de::Error),

    /// The credentials could not be serialized.
    #[error("failed to serialize credentials: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// An interactive prompt failed or was cancelled.
    #[error("prompt failed: {0}")]
    Prompt(std::io::Error),

    /// Secure token storage failed.
    #[error("secure token storage: {0}")]
    Keyring(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
