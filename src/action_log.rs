//! Setup logging for dialsvc commands.
//!
//! Every invocation is appended to a JSONL setup log so installs can be
//! audited after the fact. Logging is best-effort and never fails the
//! command it records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable overriding the setup log location.
pub const LOG_PATH_ENV: &str = "DIALSVC_SETUP_LOG";

/// A single setup log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct SetupLogEntry {
    /// ISO 8601 timestamp when the command ran
    pub timestamp: DateTime<Utc>,

    /// Command name (e.g., "install", "dialer register")
    pub command: String,

    /// Command arguments as JSON
    pub args: serde_json::Value,

    /// Whether the command succeeded
    pub success: bool,

    /// Error message if the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Command execution duration in milliseconds
    pub duration_ms: u64,

    /// User who executed the command
    pub user: String,
}

/// Append one invocation to the setup log.
///
/// This function never fails the caller - on any logging problem it warns
/// on stderr and returns Ok.
pub fn log_invocation(
    command: &str,
    args: serde_json::Value,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_path = match log_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Warning: Failed to get setup log path: {}", e);
            return Ok(());
        }
    };

    let entry = SetupLogEntry {
        timestamp: Utc::now(),
        command: command.to_string(),
        args,
        success,
        error,
        duration_ms,
        user: current_user(),
    };

    if let Err(e) = write_log_entry(&log_path, &entry) {
        eprintln!("Warning: Failed to write setup log: {}", e);
    }

    Ok(())
}

/// Setup log location: the env override, or the user's local data dir.
fn log_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(custom) = env::var(LOG_PATH_ENV) {
        return Ok(PathBuf::from(custom));
    }

    let base = dirs::data_local_dir().ok_or("Could not determine local data directory")?;
    Ok(base.join("dialsvc").join("setup.log"))
}

/// Write a log entry to the log file.
fn write_log_entry(path: &Path, entry: &SetupLogEntry) -> Result<(), Box<dyn std::error::Error>> {
    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entry)?;

    // Append to log file
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;

    Ok(())
}

/// Get the current user's username.
fn current_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
