//! CLI argument definitions for dialsvc.

use clap::{Parser, Subcommand};

/// Version string with build metadata, shown by the long `--version`.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("DIALSVC_GIT_COMMIT"),
    ", built ",
    env!("DIALSVC_BUILD_TIMESTAMP"),
    ")"
);

/// dialsvc - installer and service manager for the dial-up helper.
#[derive(Parser, Debug)]
#[command(name = "dialsvc")]
#[command(author, version, long_version = LONG_VERSION)]
#[command(about = "Installer and service manager for the dialsvc dial-up helper", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output a single JSON object instead of human-readable lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register the dialer DLL and create both services
    ///
    /// The dialer is registered first; a registration failure aborts the
    /// install before any service is created.
    Install,

    /// Remove both services and unregister the dialer DLL
    ///
    /// Unregistration is best-effort: a failure is reported but does not
    /// block removal of the services.
    Remove,

    /// Start an installed service
    Start {
        /// Start the interactive (demand-start) service instead of the
        /// automatic one
        #[arg(long)]
        interactive: bool,
    },

    /// Manage the dialer registration by itself
    Dialer {
        #[command(subcommand)]
        command: DialerCommands,
    },
}

/// Dialer registration commands
#[derive(Subcommand, Debug)]
pub enum DialerCommands {
    /// Ensure the dialer DLL path is present in the CustomDLL list
    Register {
        /// Dialer DLL path to register instead of the one next to this
        /// executable
        #[arg(long, env = "DIALSVC_DIALER_PATH")]
        path: Option<String>,
    },

    /// Remove the dialer DLL path from the CustomDLL list
    Unregister {
        /// Dialer DLL path to remove instead of the one next to this
        /// executable
        #[arg(long, env = "DIALSVC_DIALER_PATH")]
        path: Option<String>,
    },

    /// Show the CustomDLL entries and whether the dialer is registered
    Status {
        /// Dialer DLL path to check instead of the one next to this
        /// executable
        #[arg(long, env = "DIALSVC_DIALER_PATH")]
        path: Option<String>,
    },
}
