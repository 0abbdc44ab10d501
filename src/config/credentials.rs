//! Credential storage and prompting.
//!
//! Email, base URL, and board ID persist in a TOML file under the user's
//! config directory; the API token lives in the OS keyring, keyed by the
//! account email. Loading prompts interactively for all four fields when
//! anything is missing, and persists before returning, so no network call
//! ever runs without a complete credential set.

use std::fs;
use std::path::{Path, PathBuf};

use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ConfigError, Result};
use crate::api::auth;

/// The credentials file name inside the config directory.
const CREDENTIALS_FILE: &str = "credentials.toml";

/// A complete credential set for one Jira account and board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The account email address.
    pub email: String,
    /// The API token (keyring-backed, never written to disk).
    pub token: String,
    /// The Jira instance base URL.
    pub base_url: String,
    /// The board the reports run against.
    pub board_id: String,
}

/// The on-disk portion of the credentials: everything but the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredCredentials {
    /// The account email address.
    pub email: String,
    /// The Jira instance base URL.
    pub base_url: String,
    /// The board the reports run against.
    pub board_id: String,
}

impl StoredCredentials {
    /// Read the stored credentials from a file.
    ///
    /// Returns `None` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(path).map_err(ConfigError::Read)?;
        let stored = toml::from_str(&text)?;
        Ok(Some(stored))
    }

    /// Write the stored credentials to a file, creating parent directories.
    pub fn store_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDir)?;
        }

        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(ConfigError::Write)?;
        Ok(())
    }
}

impl From<&Credentials> for StoredCredentials {
    fn from(credentials: &Credentials) -> Self {
        Self {
            email: credentials.email.clone(),
            base_url: credentials.base_url.clone(),
            board_id: credentials.board_id.clone(),
        }
    }
}

impl Credentials {
    /// Load the credential set, prompting for it when incomplete.
    ///
    /// A missing file or a missing keyring token both count as "no
    /// credentials": the user is prompted for all four fields and the result
    /// is persisted before this returns.
    pub fn load_or_prompt() -> Result<Self> {
        match Self::load()? {
            Some(credentials) => Ok(credentials),
            None => Self::prompt_and_store(),
        }
    }

    /// Load the credential set from disk and keyring.
    ///
    /// Returns `None` when the file is absent or the token cannot be
    /// retrieved.
    pub fn load() -> Result<Option<Self>> {
        let path = credentials_path()?;
        let Some(stored) = StoredCredentials::load_from(&path)? else {
            return Ok(None);
        };

        match auth::get_token(&stored.email) {
            Ok(token) => Ok(Some(Self {
                email: stored.email,
                token,
                base_url: stored.base_url,
                board_id: stored.board_id,
            })),
            Err(e) => {
                warn!("No usable API token in the keyring: {}", e);
                Ok(None)
            }
        }
    }

    /// Prompt for all four fields and overwrite whatever is stored.
    pub fn prompt_and_store() -> Result<Self> {
        let credentials = Self::prompt()?;
        credentials.store()?;
        info!("Credentials saved");
        Ok(credentials)
    }

    /// Interactively collect the four credential fields.
    fn prompt() -> Result<Self> {
        let email: String = Input::new()
            .with_prompt("Please enter your account email")
            .interact_text()
            .map_err(ConfigError::Prompt)?;

        let token: String = Password::new()
            .with_prompt("Please enter your access token")
            .interact()
            .map_err(ConfigError::Prompt)?;

        let base_url: String = Input::new()
            .with_prompt("Please enter the URL of your instance")
            .interact_text()
            .map_err(ConfigError::Prompt)?;

        let board_id: String = Input::new()
            .with_prompt("Please enter your board ID")
            .interact_text()
            .map_err(ConfigError::Prompt)?;

        Ok(Self {
            email,
            token,
            base_url,
            board_id,
        })
    }

    /// Persist the credential set: file for the plain fields, keyring for
    /// the token.
    pub fn store(&self) -> Result<()> {
        let path = credentials_path()?;
        StoredCredentials::from(self).store_to(&path)?;

        auth::store_token(&self.email, &self.token)
            .map_err(|e| ConfigError::Keyring(e.to_string()))?;
        Ok(())
    }

    /// Delete all stored credentials.
    ///
    /// Failures are logged and never propagated; this is the one operation
    /// with local recovery.
    pub fn clear() {
        let path = match credentials_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("Failed to locate credentials file: {}", e);
                return;
            }
        };

        // The keyring entry is keyed by email, so read the file before
        // removing it.
        let stored = StoredCredentials::load_from(&path).unwrap_or_else(|e| {
            warn!("Failed to read credentials file: {}", e);
            None
        });

        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to delete credentials file: {}", e);
            }
        }

        if let Some(stored) = stored {
            if let Err(e) = auth::delete_token(&stored.email) {
                warn!("Failed to delete API token from keyring: {}", e);
            }
        }

        info!("Credentials cleared");
    }
}

/// The path of the credentials file inside the config directory.
fn credentials_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("sprintbook").join(CREDENTIALS_FILE))
}
