//! dialsvc CLI - installer and service manager for the dial-up helper.

use clap::Parser;
use dialsvc::action_log;
use dialsvc::cli::{Cli, Commands, DialerCommands};
use dialsvc::commands::{self, CommandResult};
use std::process;
use std::time::Instant;

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    // Start timing
    let start = Instant::now();

    // Execute command
    let result = run_command(cli.command, json);

    // Calculate duration
    let duration = start.elapsed().as_millis() as u64;

    // Determine success/error
    let (success, error) = match &result {
        Ok(_) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    // Log the invocation (silently fails if logging encounters errors)
    let _ = action_log::log_invocation(&cmd_name, args_json, success, error, duration);

    // Handle result
    if let Err(e) = result {
        if json {
            eprintln!(r#"{{"error": "{}"}}"#, e);
        } else {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

fn run_command(command: Commands, json: bool) -> Result<(), dialsvc::Error> {
    match command {
        Commands::Install => {
            let result = commands::install()?;
            output(&result, json);
        }

        Commands::Remove => {
            let result = commands::remove()?;
            output(&result, json);
        }

        Commands::Start { interactive } => {
            let result = commands::start(interactive)?;
            output(&result, json);
        }

        Commands::Dialer { command } => match command {
            DialerCommands::Register { path } => {
                let result = commands::dialer_register(path)?;
                output(&result, json);
            }
            DialerCommands::Unregister { path } => {
                let result = commands::dialer_unregister(path)?;
                output(&result, json);
            }
            DialerCommands::Status { path } => {
                let result = commands::dialer_status(path)?;
                output(&result, json);
            }
        },
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: CommandResult>(result: &T, json: bool) {
    if json {
        println!("{}", result.to_json());
    } else {
        println!("{}", result.to_human());
    }
}

/// Serialize command to extract name and arguments for logging.
fn serialize_command(command: &Commands) -> (String, serde_json::Value) {
    match command {
        Commands::Install => ("install".to_string(), serde_json::json!({})),

        Commands::Remove => ("remove".to_string(), serde_json::json!({})),

        Commands::Start { interactive } => (
            "start".to_string(),
            serde_json::json!({ "interactive": interactive }),
        ),

        Commands::Dialer { command } => match command {
            DialerCommands::Register { path } => (
                "dialer register".to_string(),
                serde_json::json!({ "path": path }),
            ),
            DialerCommands::Unregister { path } => (
                "dialer unregister".to_string(),
                serde_json::json!({ "path": path }),
            ),
            DialerCommands::Status { path } => (
                "dialer status".to_string(),
                serde_json::json!({ "path": path }),
            ),
        },
    }
}
