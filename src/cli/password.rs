//! Password management commands
//!
//! The password is keyed by the server and username of the saved
//! configuration.

use crate::cli::setup::{prompt_password, prompt_yes_no};
use rdhost_core::auth::keyring;
use rdhost_core::config::toml_config::load_config;
use rdhost_core::error::RdhostError;
use tracing::info;

/// Run the password set command
pub fn run_password_set() -> Result<(), RdhostError> {
    let config = load_config()?;
    let session = &config.session;

    if keyring::has_password(&session.server, &session.username)? {
        let question = format!(
            "Replace the stored password for {}@{}?",
            session.username, session.server
        );
        if !prompt_yes_no(&question, false)? {
            println!("Password unchanged.");
            return Ok(());
        }
    }

    let password = prompt_password("Password")?;
    keyring::store_password(&session.server, &session.username, &password)?;

    info!(password_len = password.len(), "Stored session password");
    println!("✅ Password stored for {}@{}", session.username, session.server);
    Ok(())
}

/// Run the password clear command
pub fn run_password_clear() -> Result<(), RdhostError> {
    let config = load_config()?;
    let session = &config.session;

    keyring::delete_password(&session.server, &session.username)?;

    println!("✅ Password removed for {}@{}", session.username, session.server);
    Ok(())
}
