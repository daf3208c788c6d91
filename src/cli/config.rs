//! Configuration inspection commands

use colored::Colorize;
use rdhost_core::auth::keyring;
use rdhost_core::config::toml_config::{get_config_path, load_config};
use rdhost_core::error::RdhostError;
use tracing::warn;

/// Run the config show command
pub fn run_config_show() -> Result<(), RdhostError> {
    let config = load_config()?;
    let session = &config.session;

    println!("{}", "Session".bold());
    println!("  Name:        {}", session.title());
    println!("  Server:      {}", session.server);
    if session.port != 0 {
        println!("  Port:        {}", session.port);
    }
    println!("  Username:    {}", session.username);
    println!("  Domain:      {}", session.domain_or_none());
    println!("  Desktop:     {}", session.desktop_size());
    println!("  Color depth: {} bpp", session.color_depth);
    println!("  Fullscreen:  {}", session.fullscreen);

    // The keyring may be locked or absent; that should not hide the file contents
    let password = match keyring::has_password(&session.server, &session.username) {
        Ok(true) => "stored in keyring".green(),
        Ok(false) => "not stored".yellow(),
        Err(e) => {
            warn!("Keyring lookup failed: {}", e);
            "keyring unavailable".red()
        }
    };
    println!("  Password:    {}", password);

    println!();
    println!("{}", "Engine".bold());
    for option in config.engine.to_engine_options() {
        println!("  {:<26} {:?}", option.name(), option);
    }

    println!();
    println!("{}", "Reconnect".bold());
    println!("  Poll interval: {} ms", config.reconnect.poll_interval_ms);
    match config.reconnect.max_wait() {
        Some(limit) => println!("  Max wait:      {} s", limit.as_secs()),
        None => println!("  Max wait:      unbounded"),
    }

    println!();
    println!("{}", "Alerts".bold());
    println!(
        "  Authentication codes: {:?}",
        config.alerts.authentication_codes
    );
    println!(
        "  Internal error codes: {:?}",
        config.alerts.internal_error_codes
    );

    Ok(())
}

/// Run the config check command
pub fn run_config_check() -> Result<(), RdhostError> {
    let path = get_config_path()?;
    // Loading validates every section
    let config = load_config()?;

    println!("✅ {} is valid", path.display());
    println!(
        "   {}@{} with {} engine options",
        config.session.username,
        config.session.server,
        config.engine.to_engine_options().len()
    );

    Ok(())
}
