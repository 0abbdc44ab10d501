//! Centralized error types for sprintbook.
//!
//! This module provides a unified error hierarchy for the application with
//! user-friendly error messages. All error types use `thiserror` for
//! ergonomic error handling.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;
use crate::sheet::SheetError;

/// The main application error type.
///
/// Aggregates the component errors plus the business-rule violations of the
/// report flows, providing user-friendly messages while preserving the
/// underlying context for the log.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Workbook output errors.
    #[error("{0}")]
    Sheet(#[from] SheetError),

    /// IO errors (prompts, file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The board has more than one active sprint.
    #[error("There is more than one active sprint in your board.")]
    MultipleActiveSprints,

    /// The board has no active sprint.
    #[error("There is no active sprint in your board.")]
    NoActiveSprint,

    /// The board has no closed sprint yet.
    #[error("There is no closed sprint in your board.")]
    NoClosedSprints,
}

impl AppError {
    /// Get a user-friendly message for display.
    ///
    /// This returns a message suitable for the terminal, without technical
    /// jargon or stack traces.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find the configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDir(_) => {
                    "Could not create the configuration directory. Check file permissions."
                        .to_string()
                }
                ConfigError::Read(_) => {
                    "Could not read the credentials file. Please check it exists and is readable."
                        .to_string()
                }
                ConfigError::Write(_) => {
                    "Could not save credentials. Please check file permissions.".to_string()
                }
                ConfigError::Parse(_) => {
                    "The credentials file is invalid. Reset your credentials to recreate it."
                        .to_string()
                }
                ConfigError::Serialize(_) => {
                    "Could not save credentials. Internal error.".to_string()
                }
                ConfigError::Prompt(_) => "Input cancelled.".to_string(),
                ConfigError::Keyring(_) => {
                    "Could not access secure storage. Please reset your credentials.".to_string()
                }
            },
            AppError::Api(e) => match e {
                ApiError::Unauthorized => {
                    "Authentication failed. Please check your email and API token.".to_string()
                }
                ApiError::Forbidden => {
                    "Access denied. You don't have permission to access this resource.".to_string()
                }
                ApiError::NotFound(resource) => format!("'{}' was not found.", resource),
                ApiError::RateLimited => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ApiError::ServerError(_) => {
                    "Jira server error. Please try again later.".to_string()
                }
                ApiError::Network(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::Keyring(_) => {
                    "Could not access secure storage. Please reset your credentials.".to_string()
                }
                ApiError::InvalidResponse(msg) => {
                    format!("Unexpected response from Jira: {}", msg)
                }
            },
            AppError::Sheet(e) => format!("Could not write the report: {}", e),
            AppError::Io(_) => "An IO operation failed.".to_string(),
            AppError::MultipleActiveSprints
            | AppError::NoActiveSprint
            | AppError::NoClosedSprints => self.to_string(),
        }
    }
}
