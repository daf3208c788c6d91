//! rdhost - remote desktop session host tooling
//!
//! Inspects and prepares the session configuration used by the lifecycle
//! controller, manages stored session passwords and decodes the status
//! codes reported by the remote desktop engine.

use clap::{Parser, Subcommand};
use rdhost_core::{error::RdhostError, init_logging};

mod cli;

#[derive(Parser)]
#[command(name = "rdhost")]
#[command(about = "Remote desktop session configuration and diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Explain an engine status code
    Decode {
        #[command(subcommand)]
        kind: DecodeCommands,
    },
    /// Create, show or check the session configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Manage the session password stored in the system keyring
    Password {
        #[command(subcommand)]
        action: PasswordCommands,
    },
}

#[derive(Subcommand)]
enum DecodeCommands {
    /// Disconnect reason code
    Disconnect(CodeArgs),
    /// Warning code
    Warning(CodeArgs),
    /// Fatal error code
    Fatal(CodeArgs),
}

#[derive(clap::Args)]
struct CodeArgs {
    /// Numeric code reported by the engine
    #[arg(allow_negative_numbers = true)]
    code: i32,
    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Interactively create the configuration
    Init,
    /// Print the current configuration
    Show,
    /// Validate the configuration file
    Check,
}

#[derive(Subcommand)]
enum PasswordCommands {
    /// Store the session password
    Set,
    /// Remove the stored session password
    Clear,
}

fn main() {
    // Initialize logging
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode { kind } => match kind {
            DecodeCommands::Disconnect(args) => {
                cli::decode::run_decode(cli::decode::CodeKind::Disconnect, args.code, args.json)
            }
            DecodeCommands::Warning(args) => {
                cli::decode::run_decode(cli::decode::CodeKind::Warning, args.code, args.json)
            }
            DecodeCommands::Fatal(args) => {
                cli::decode::run_decode(cli::decode::CodeKind::Fatal, args.code, args.json)
            }
        },
        Commands::Config { action } => match action {
            ConfigCommands::Init => cli::setup::run_setup(),
            ConfigCommands::Show => cli::config::run_config_show(),
            ConfigCommands::Check => cli::config::run_config_check(),
        },
        Commands::Password { action } => match action {
            PasswordCommands::Set => cli::password::run_password_set(),
            PasswordCommands::Clear => cli::password::run_password_clear(),
        },
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration errors (exit code 2)
                RdhostError::Config(_) | RdhostError::Toml(_) | RdhostError::TomlSerialize(_) => 2,
                // Keyring errors (exit code 2 for configuration/setup issues)
                RdhostError::Keyring(_) => 2,
                // Session and IO errors (exit code 1 - runtime)
                RdhostError::Session(_) | RdhostError::Io(_) => 1,
            };

            eprintln!("{}", e);
            std::process::exit(exit_code);
        }
    }
}
