//! Mock keyring implementation for testing
//!
//! Provides an in-memory keyring implementation that doesn't require
//! system keyring access. Used in CI environments and for testing.

use crate::auth::account_name;
use crate::error::{KeyringError, RdhostError};
use crate::types::{SessionPassword, KEYRING_SERVICE_SESSION};
use std::collections::HashMap;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref MOCK_KEYRING: Mutex<HashMap<String, String>> = Mutex::new(HashMap::new());
}

fn make_key(server: &str, username: &str) -> String {
    format!("{}:{}", KEYRING_SERVICE_SESSION, account_name(server, username))
}

/// Store a session password in the mock keyring
pub fn store_password(
    server: &str,
    username: &str,
    password: &SessionPassword,
) -> Result<(), RdhostError> {
    let mut keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| RdhostError::Keyring(KeyringError::StoreFailed))?;
    keyring.insert(make_key(server, username), password.expose().to_string());
    Ok(())
}

/// Retrieve a session password from the mock keyring
pub fn retrieve_password(server: &str, username: &str) -> Result<SessionPassword, RdhostError> {
    let keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| RdhostError::Keyring(KeyringError::RetrieveFailed))?;
    keyring
        .get(&make_key(server, username))
        .cloned()
        .map(SessionPassword::new)
        .ok_or(RdhostError::Keyring(KeyringError::NotFound))
}

/// Check if a password exists in the mock keyring
pub fn has_password(server: &str, username: &str) -> Result<bool, RdhostError> {
    let keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| RdhostError::Keyring(KeyringError::ServiceUnavailable))?;
    Ok(keyring.contains_key(&make_key(server, username)))
}

/// Delete a password from the mock keyring
pub fn delete_password(server: &str, username: &str) -> Result<(), RdhostError> {
    let mut keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| RdhostError::Keyring(KeyringError::StoreFailed))?;
    keyring.remove(&make_key(server, username));
    Ok(())
}
