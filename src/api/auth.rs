//! Authentication handling for the Jira API.
//!
//! This module handles authentication with Jira using Basic Auth
//! (email + API token) and secure token storage via the OS keyring.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::error::{ApiError, Result};

/// The keyring service name for sprintbook tokens.
const KEYRING_SERVICE: &str = "sprintbook";

/// Authentication credentials for Jira.
#[derive(Debug, Clone)]
pub struct Auth {
    /// The Base64-encoded authorization header value.
    auth_header: String,
}

impl Auth {
    /// Create new authentication credentials from email and token.
    ///
    /// The pair is immediately encoded; neither the email nor the raw token
    /// is stored.
    pub fn new(email: &str, token: &str) -> Self {
        Self {
            auth_header: build_auth_header(email, token),
        }
    }

    /// Get the authorization header value for HTTP requests.
    ///
    /// Returns the complete "Basic ..." header value.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }
}

/// Build the Basic Auth header value.
///
/// Encodes "email:token" in Base64 and prepends "Basic ".
fn build_auth_header(email: &str, token: &str) -> String {
    let credentials = format!("{}:{}", email, token);
    let encoded = BASE64.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}

/// Store an API token in the OS keyring, keyed by the account email.
///
/// # Errors
///
/// Returns an error if the token cannot be stored in the keyring.
pub fn store_token(email: &str, token: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, email)
        .map_err(|e| ApiError::Keyring(format!("failed to create keyring entry: {}", e)))?;

    entry
        .set_password(token)
        .map_err(|e| ApiError::Keyring(format!("failed to store token: {}", e)))?;

    Ok(())
}

/// Retrieve an API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be retrieved from the keyring.
pub fn get_token(email: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, email)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

/// Delete an API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be deleted from the keyring.
pub fn delete_token(email: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, email)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .delete_password()
        .map_err(|e| ApiError::Keyring(format!("failed to delete token: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_auth_header() {
        // Test case from Atlassian docs
        let header = build_auth_header("user@example.com", "api_token_here");
        assert!(header.starts_with("Basic "));

        // Decode and verify
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        let decoded_str = String::from_utf8(decoded).unwrap();
        assert_eq!(decoded_str, "user@example.com:api_token_here");
    }

    #[test]
    fn test_auth_new() {
        let auth = Auth::new("user@example.com", "secret_token");
        assert!(auth.header_value().starts_with("Basic "));
    }

    #[test]
    fn test_auth_header_value_format() {
        let auth = Auth::new("test@test.com", "token123");
        let header = auth.header_value();

        // Should be valid Base64 after "Basic "
        let encoded = header.strip_prefix("Basic ").unwrap();
        assert!(BASE64.decode(encoded).is_ok());
    }

    #[test]
    fn test_auth_does_not_expose_token() {
        let auth = Auth::new("user@example.com", "secret_token");
        let debug_output = format!("{:?}", auth);

        // Token should not appear in debug output
        assert!(!debug_output.contains("secret_token"));
    }
}
