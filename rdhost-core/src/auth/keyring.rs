//! Keyring operations for secure credential storage
//!
//! Uses the system keyring (Secret Service on Linux) to store and retrieve
//! session passwords.

use crate::auth::account_name;
use crate::error::{KeyringError, RdhostError};
use crate::types::{SessionPassword, KEYRING_SERVICE_SESSION};
use keyring::Entry;

fn entry(server: &str, username: &str) -> Result<Entry, RdhostError> {
    Entry::new(KEYRING_SERVICE_SESSION, &account_name(server, username))
        .map_err(|_| RdhostError::Keyring(KeyringError::ServiceUnavailable))
}

/// Store a session password in the system keyring
pub fn store_password(
    server: &str,
    username: &str,
    password: &SessionPassword,
) -> Result<(), RdhostError> {
    entry(server, username)?
        .set_password(password.expose())
        .map_err(|_| RdhostError::Keyring(KeyringError::StoreFailed))
}

/// Retrieve a session password from the system keyring
pub fn retrieve_password(server: &str, username: &str) -> Result<SessionPassword, RdhostError> {
    match entry(server, username)?.get_password() {
        Ok(password) => Ok(SessionPassword::new(password)),
        Err(keyring::Error::NoEntry) => Err(RdhostError::Keyring(KeyringError::NotFound)),
        Err(_) => Err(RdhostError::Keyring(KeyringError::RetrieveFailed)),
    }
}

/// Check if a password is stored for the given server/user pair
pub fn has_password(server: &str, username: &str) -> Result<bool, RdhostError> {
    match entry(server, username)?.get_password() {
        Ok(_) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Delete a stored session password
///
/// Deleting a password that was never stored is not an error.
pub fn delete_password(server: &str, username: &str) -> Result<(), RdhostError> {
    match entry(server, username)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(_) => Err(RdhostError::Keyring(KeyringError::StoreFailed)),
    }
}
