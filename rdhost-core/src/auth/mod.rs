//! Credential storage
//!
//! Session passwords live in the system keyring, keyed by `user@host`, and
//! are never written to the configuration file.

// Use mock keyring in test mode or CI environment
#[cfg(any(test, feature = "mock-keyring"))]
#[path = "keyring_mock.rs"]
pub mod keyring;

// Use real keyring in production
#[cfg(not(any(test, feature = "mock-keyring")))]
pub mod keyring;

/// Keyring account name for a server/user pair
pub fn account_name(server: &str, username: &str) -> String {
    format!("{}@{}", username, server)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_name() {
        assert_eq!(account_name("rds.example.com", "alice"), "alice@rds.example.com");
    }
}
