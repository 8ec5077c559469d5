//! Service lifecycle orchestration for the dialsvc daemon.
//!
//! Thin wrapper over the platform service manager: install, start, and
//! remove the two cooperating services. The daemon the services execute is
//! a separate binary installed next to this one.

use std::ffi::OsString;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use service_manager::{
    RestartPolicy, ServiceInstallCtx, ServiceLabel, ServiceManager, ServiceStartCtx,
    ServiceStopCtx, ServiceUninstallCtx,
};

/// Attempts made to remove a service while it finishes stopping.
const UNINSTALL_ATTEMPTS: u32 = 5;

/// Delay between removal attempts.
const UNINSTALL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Error type for service manager operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("service manager not available: {0}")]
    NotAvailable(String),

    #[error("failed to install {label}: {reason}")]
    InstallFailed { label: String, reason: String },

    #[error("failed to remove {label}: {reason}")]
    UninstallFailed { label: String, reason: String },

    #[error("failed to start {label}: {reason}")]
    StartFailed { label: String, reason: String },

    #[error("failed to stop {label}: {reason}")]
    StopFailed { label: String, reason: String },
}

/// The two cooperating services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// Starts with the system and runs the daemon unattended.
    Automatic,
    /// Demand-start variant that runs the daemon interactively.
    Interactive,
}

impl ServiceKind {
    pub fn label_str(self) -> &'static str {
        match self {
            ServiceKind::Automatic => "com.dialsvc.automatic",
            ServiceKind::Interactive => "com.dialsvc.interactive",
        }
    }

    fn label(self) -> ServiceLabel {
        self.label_str().parse().unwrap()
    }
}

/// Everything needed to install one service, passed by value rather than
/// read from shared state.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub kind: ServiceKind,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub autostart: bool,
}

impl ServiceConfig {
    /// The automatic service: autostart, no extra daemon flags.
    pub fn automatic(program: PathBuf) -> Self {
        Self {
            kind: ServiceKind::Automatic,
            program,
            args: Vec::new(),
            autostart: true,
        }
    }

    /// The interactive service: demand start, daemon runs with
    /// `--interactive`.
    pub fn interactive(program: PathBuf) -> Self {
        Self {
            kind: ServiceKind::Interactive,
            program,
            args: vec![OsString::from("--interactive")],
            autostart: false,
        }
    }
}

/// Service controller wrapping the platform's native service manager.
pub struct ServiceController {
    manager: Box<dyn ServiceManager>,
}

impl ServiceController {
    /// Connect to the platform's native service manager.
    pub fn native() -> Result<Self, ServiceError> {
        let manager = <dyn ServiceManager>::native()
            .map_err(|e| ServiceError::NotAvailable(e.to_string()))?;
        Ok(Self { manager })
    }

    /// Install one service from its config.
    pub fn install(&self, config: &ServiceConfig) -> Result<(), ServiceError> {
        let ctx = ServiceInstallCtx {
            label: config.kind.label(),
            program: config.program.clone(),
            args: config.args.clone(),
            contents: None,
            username: None,
            working_directory: None,
            environment: None,
            autostart: config.autostart,
            restart_policy: RestartPolicy::OnFailure {
                delay_secs: Some(5),
            },
        };

        self.manager
            .install(ctx)
            .map_err(|e| ServiceError::InstallFailed {
                label: config.kind.label_str().to_string(),
                reason: e.to_string(),
            })
    }

    /// Start a service.
    pub fn start(&self, kind: ServiceKind) -> Result<(), ServiceError> {
        let ctx = ServiceStartCtx { label: kind.label() };

        self.manager
            .start(ctx)
            .map_err(|e| ServiceError::StartFailed {
                label: kind.label_str().to_string(),
                reason: e.to_string(),
            })
    }

    /// Stop a service.
    pub fn stop(&self, kind: ServiceKind) -> Result<(), ServiceError> {
        let ctx = ServiceStopCtx { label: kind.label() };

        self.manager
            .stop(ctx)
            .map_err(|e| ServiceError::StopFailed {
                label: kind.label_str().to_string(),
                reason: e.to_string(),
            })
    }

    /// Remove a service, retrying while it finishes stopping.
    ///
    /// A stop request is issued first; a service that was not running
    /// rejects it, which is fine. Removal is then attempted on a bounded
    /// one-second backoff and the last error propagates.
    pub fn uninstall(&self, kind: ServiceKind) -> Result<(), ServiceError> {
        let _ = self.stop(kind);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .manager
                .uninstall(ServiceUninstallCtx { label: kind.label() })
            {
                Ok(()) => return Ok(()),
                Err(_) if attempt < UNINSTALL_ATTEMPTS => thread::sleep(UNINSTALL_RETRY_DELAY),
                Err(e) => {
                    return Err(ServiceError::UninstallFailed {
                        label: kind.label_str().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_automatic_config() {
        let config = ServiceConfig::automatic(PathBuf::from(r"C:\dialsvc\dialsvcd.exe"));
        assert_eq!(config.kind, ServiceKind::Automatic);
        assert!(config.autostart);
        assert!(config.args.is_empty());
    }

    #[test]
    fn test_interactive_config() {
        let config = ServiceConfig::interactive(PathBuf::from(r"C:\dialsvc\dialsvcd.exe"));
        assert_eq!(config.kind, ServiceKind::Interactive);
        assert!(!config.autostart);
        assert_eq!(config.args, [OsString::from("--interactive")]);
    }

    #[test]
    fn test_labels_parse() {
        for kind in [ServiceKind::Automatic, ServiceKind::Interactive] {
            assert!(kind.label_str().parse::<ServiceLabel>().is_ok());
        }
    }
}
