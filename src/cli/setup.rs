//! Config init command implementation
//!
//! Interactive first-time session configuration with the password kept in
//! the system keyring.

use rdhost_core::{
    auth::keyring,
    config::{toml_config, toml_config::TomlConfig, SessionConfig},
    error::{ConfigError, KeyringError, RdhostError},
    types::SessionPassword,
};
use std::io::{self, Write};

/// Run the config init command
pub fn run_setup() -> Result<(), RdhostError> {
    println!("🖥️  rdhost Session Setup");
    println!("========================");
    println!();
    println!("This will configure a remote desktop session.");
    println!("The password will be stored in your system keyring.");
    println!(
        "Configuration will be saved to {}",
        toml_config::get_config_path()?.display()
    );
    println!();

    // Check if already configured
    if let Ok(true) = toml_config::config_exists() {
        println!("⚠️  Existing configuration detected.");
        if !prompt_yes_no("Overwrite existing setup?", false)? {
            println!("Setup cancelled.");
            return Ok(());
        }
        println!();
    }

    let session = collect_session_config()?;

    session.validate().map_err(|e| {
        RdhostError::Config(ConfigError::ValidationError {
            message: format!("Configuration validation failed: {}", e),
        })
    })?;

    println!();
    let store = prompt_yes_no("Store the session password in the keyring?", true)?;
    let password = if store {
        Some(prompt_password("Password")?)
    } else {
        None
    };

    println!();
    println!("💾 Saving configuration...");

    toml_config::save_config(&TomlConfig::new(session.clone()))?;

    if let Some(password) = password {
        keyring::store_password(&session.server, &session.username, &password).map_err(|e| {
            println!("❌ Keyring is not available or locked.");
            println!("The configuration was saved; run `rdhost password set` once it is unlocked.");
            match e {
                RdhostError::Keyring(_) => RdhostError::Keyring(KeyringError::ServiceUnavailable),
                other => other,
            }
        })?;
    }

    println!("✅ Setup complete!");
    println!();
    println!("You can now use:");
    println!("  rdhost config show     - Review the session configuration");
    println!("  rdhost config check    - Validate the configuration file");
    println!("  rdhost password set    - Change the stored password");

    Ok(())
}

/// Collect session settings interactively
fn collect_session_config() -> Result<SessionConfig, RdhostError> {
    println!("Session Configuration:");
    println!("---------------------");

    let server = prompt_required("Server (hostname or IP)", "")?;
    let username = prompt_required("Username", "")?;
    let domain = prompt_optional("Domain (optional)", "")?;
    let port = parse_number::<u16>(&prompt_optional("Port (0 = engine default)", "0")?, "port")?;
    let color_depth = parse_number::<u8>(&prompt_required("Color depth", "32")?, "color depth")?;
    let width = parse_number::<u32>(&prompt_required("Desktop width", "1024")?, "desktop width")?;
    let height =
        parse_number::<u32>(&prompt_required("Desktop height", "768")?, "desktop height")?;
    let display_name = prompt_optional("Display name (optional)", "")?;

    let mut session = SessionConfig::new(server, username);
    session.domain = if domain.is_empty() { None } else { Some(domain) };
    session.port = port;
    session.color_depth = color_depth;
    session.desktop_width = width;
    session.desktop_height = height;
    session.display_name = display_name;

    Ok(session)
}

fn parse_number<T: std::str::FromStr>(input: &str, field: &str) -> Result<T, RdhostError> {
    input.parse().map_err(|_| {
        RdhostError::Config(ConfigError::ValidationError {
            message: format!("Invalid {}: {}", field, input),
        })
    })
}

/// Prompt for a required value with default
fn prompt_required(prompt: &str, default: &str) -> Result<String, RdhostError> {
    let prompt_text = if default.is_empty() {
        format!("{}: ", prompt)
    } else {
        format!("{} [{}]: ", prompt, default)
    };

    loop {
        let input = prompt_input(&prompt_text)?;

        if input.trim().is_empty() {
            if !default.is_empty() {
                return Ok(default.to_string());
            }
            println!("❌ This field is required. Please enter a value.");
            continue;
        }

        return Ok(input.trim().to_string());
    }
}

/// Prompt for an optional value
fn prompt_optional(prompt: &str, default: &str) -> Result<String, RdhostError> {
    let prompt_text = format!("{} [{}]: ", prompt, default);
    let input = prompt_input(&prompt_text)?;

    if input.trim().is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input.trim().to_string())
    }
}

/// Prompt for a non-empty password
pub(crate) fn prompt_password(prompt: &str) -> Result<SessionPassword, RdhostError> {
    let prompt_text = format!("{}: ", prompt);

    loop {
        let input = prompt_input(&prompt_text)?;
        if input.is_empty() {
            println!("❌ Password cannot be empty. Please try again.");
            continue;
        }
        return Ok(SessionPassword::new(input));
    }
}

/// Prompt for yes/no with default
pub(crate) fn prompt_yes_no(prompt: &str, default_yes: bool) -> Result<bool, RdhostError> {
    let default_indicator = if default_yes { "[Y/n]" } else { "[y/N]" };
    let prompt_text = format!("{} {}: ", prompt, default_indicator);

    loop {
        let input = prompt_input(&prompt_text)?.to_lowercase();

        match input.as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            "" => return Ok(default_yes),
            _ => {
                println!("Please enter 'y' for yes or 'n' for no.");
                continue;
            }
        }
    }
}

/// Low-level input prompting
fn prompt_input(prompt: &str) -> Result<String, RdhostError> {
    print!("{}", prompt);
    io::stdout().flush().map_err(RdhostError::Io)?;

    let mut input = String::new();
    let read = io::stdin().read_line(&mut input).map_err(RdhostError::Io)?;
    if read == 0 {
        return Err(RdhostError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Input closed before setup finished",
        )));
    }

    Ok(input.trim_end().to_string())
}
