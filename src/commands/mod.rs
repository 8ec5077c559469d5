//! Command implementations for the dialsvc CLI.
//!
//! One function per CLI operation, each returning a serializable result
//! struct with JSON and human renderings. The `*_with_store` variants take
//! the value store as a parameter so tests can run the same workflows
//! against `MemoryStore`.

use std::path::PathBuf;

use serde::Serialize;

use crate::dialer::registration::{self, RegistrationOutcome};
use crate::service::{ServiceConfig, ServiceController, ServiceKind};
use crate::store::ValueStore;
use crate::{Error, Result};

/// Filename of the dialer DLL, expected next to this executable.
pub const DIALER_DLL_NAME: &str = "dialsvc-dialer.dll";

/// Filename of the daemon the services run, expected next to this
/// executable.
pub const DAEMON_EXE_NAME: &str = "dialsvcd.exe";

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult: Serialize {
    /// Serialize to JSON string.
    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"serialization failed"}"#.to_string())
    }

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Result of `install`.
#[derive(Debug, Serialize)]
pub struct InstallResult {
    pub dialer_path: String,
    pub dialer: RegistrationOutcome,
    pub store: String,
    pub services: Vec<String>,
}

impl CommandResult for InstallResult {
    fn to_human(&self) -> String {
        let mut lines = vec![self.dialer.describe(&self.dialer_path)];
        for service in &self.services {
            lines.push(format!("{service} installed."));
        }
        lines.join("\n")
    }
}

/// Result of `remove`.
#[derive(Debug, Serialize)]
pub struct RemoveResult {
    pub dialer_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialer: Option<RegistrationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialer_error: Option<String>,
    pub services: Vec<String>,
}

impl CommandResult for RemoveResult {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        match (&self.dialer, &self.dialer_error) {
            (Some(outcome), _) => lines.push(outcome.describe(&self.dialer_path)),
            (None, Some(err)) => {
                lines.push(format!("Dialer unregistration failed; continuing: {err}"));
            }
            (None, None) => {}
        }
        for service in &self.services {
            lines.push(format!("{service} removed."));
        }
        lines.join("\n")
    }
}

/// Result of `start`.
#[derive(Debug, Serialize)]
pub struct StartResult {
    pub service: String,
}

impl CommandResult for StartResult {
    fn to_human(&self) -> String {
        format!("{} started.", self.service)
    }
}

/// Result of `dialer register` and `dialer unregister`.
#[derive(Debug, Serialize)]
pub struct DialerMutationResult {
    pub path: String,
    pub outcome: RegistrationOutcome,
    pub store: String,
}

impl CommandResult for DialerMutationResult {
    fn to_human(&self) -> String {
        format!("{} ({})", self.outcome.describe(&self.path), self.store)
    }
}

/// Result of `dialer status`.
#[derive(Debug, Serialize)]
pub struct DialerStatusResult {
    pub path: String,
    pub registered: bool,
    pub entries: Vec<String>,
    pub store: String,
}

impl CommandResult for DialerStatusResult {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} is {}registered in {}",
            self.path,
            if self.registered { "" } else { "not " },
            self.store
        )];
        if self.entries.is_empty() {
            lines.push("The value is absent (no entries)".to_string());
        } else {
            lines.push(format!("{} entries:", self.entries.len()));
            for entry in &self.entries {
                lines.push(format!("  {entry}"));
            }
        }
        lines.join("\n")
    }
}

/// Register the dialer DLL, then create both services.
///
/// Registration runs first and a failure blocks the install: no service is
/// created unless the dialer list mutation succeeded.
pub fn install() -> Result<InstallResult> {
    ensure_windows()?;
    let dialer_path = resolve_dialer_path(None)?;
    let mut store = open_store()?;
    let outcome = registration::register(store.as_mut(), &dialer_path)?;
    let store_location = store.location();

    let controller = ServiceController::native()?;
    let daemon = daemon_path()?;
    let mut services = Vec::new();
    for config in [
        ServiceConfig::automatic(daemon.clone()),
        ServiceConfig::interactive(daemon),
    ] {
        controller.install(&config)?;
        services.push(config.kind.label_str().to_string());
    }

    Ok(InstallResult {
        dialer_path,
        dialer: outcome,
        store: store_location,
        services,
    })
}

/// Unregister the dialer DLL (best-effort), then remove both services.
///
/// An unregistration failure is reported in the result but never blocks
/// removal of the services.
pub fn remove() -> Result<RemoveResult> {
    ensure_windows()?;
    let dialer_path = resolve_dialer_path(None)?;
    let (dialer, dialer_error) = match open_store()
        .and_then(|mut store| registration::unregister(store.as_mut(), &dialer_path))
    {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let controller = ServiceController::native()?;
    let mut services = Vec::new();
    for kind in [ServiceKind::Automatic, ServiceKind::Interactive] {
        controller.uninstall(kind)?;
        services.push(kind.label_str().to_string());
    }

    Ok(RemoveResult {
        dialer_path,
        dialer,
        dialer_error,
        services,
    })
}

/// Start one of the installed services.
pub fn start(interactive: bool) -> Result<StartResult> {
    ensure_windows()?;
    let kind = if interactive {
        ServiceKind::Interactive
    } else {
        ServiceKind::Automatic
    };
    let controller = ServiceController::native()?;
    controller.start(kind)?;
    Ok(StartResult {
        service: kind.label_str().to_string(),
    })
}

/// Ensure the dialer DLL path is present in the list.
pub fn dialer_register(path: Option<String>) -> Result<DialerMutationResult> {
    ensure_windows()?;
    let path = resolve_dialer_path(path)?;
    let mut store = open_store()?;
    dialer_register_with_store(store.as_mut(), &path)
}

/// Dependency-injected variant of [`dialer_register`].
pub fn dialer_register_with_store(
    store: &mut dyn ValueStore,
    path: &str,
) -> Result<DialerMutationResult> {
    let outcome = registration::register(store, path)?;
    Ok(DialerMutationResult {
        path: path.to_string(),
        outcome,
        store: store.location(),
    })
}

/// Ensure the dialer DLL path is absent from the list.
pub fn dialer_unregister(path: Option<String>) -> Result<DialerMutationResult> {
    ensure_windows()?;
    let path = resolve_dialer_path(path)?;
    let mut store = open_store()?;
    dialer_unregister_with_store(store.as_mut(), &path)
}

/// Dependency-injected variant of [`dialer_unregister`].
pub fn dialer_unregister_with_store(
    store: &mut dyn ValueStore,
    path: &str,
) -> Result<DialerMutationResult> {
    let outcome = registration::unregister(store, path)?;
    Ok(DialerMutationResult {
        path: path.to_string(),
        outcome,
        store: store.location(),
    })
}

/// Show the list entries and whether the dialer DLL is registered.
pub fn dialer_status(path: Option<String>) -> Result<DialerStatusResult> {
    ensure_windows()?;
    let path = resolve_dialer_path(path)?;
    let store = open_store()?;
    dialer_status_with_store(store.as_ref(), &path)
}

/// Dependency-injected variant of [`dialer_status`].
pub fn dialer_status_with_store(
    store: &dyn ValueStore,
    path: &str,
) -> Result<DialerStatusResult> {
    let list = store.read()?.unwrap_or_default();
    Ok(DialerStatusResult {
        registered: list.contains(path),
        entries: list.entries().to_vec(),
        path: path.to_string(),
        store: store.location(),
    })
}

/// Registry and service commands only make sense on a Windows host.
fn ensure_windows() -> Result<()> {
    if cfg!(windows) {
        Ok(())
    } else {
        Err(Error::WindowsOnly)
    }
}

fn open_store() -> Result<Box<dyn ValueStore>> {
    #[cfg(windows)]
    {
        Ok(Box::new(crate::store::RegistryValueStore::open()?))
    }
    #[cfg(not(windows))]
    {
        Err(Error::WindowsOnly)
    }
}

/// Directory this executable was installed to.
fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| {
        Error::InvalidInput(format!(
            "executable path has no parent directory: {}",
            exe.display()
        ))
    })?;
    Ok(dir.to_path_buf())
}

/// Absolute path of a file installed next to this executable.
fn sibling_path(file_name: &str) -> Result<String> {
    let path = install_dir()?.join(file_name);
    path.into_os_string().into_string().map_err(|p| {
        Error::InvalidInput(format!(
            "install path is not valid Unicode: {}",
            PathBuf::from(p).display()
        ))
    })
}

/// Dialer DLL path: the explicit override, or the file next to this
/// executable.
fn resolve_dialer_path(path: Option<String>) -> Result<String> {
    match path {
        Some(p) if p.is_empty() => Err(Error::InvalidInput("--path must not be empty".into())),
        Some(p) => Ok(p),
        None => sibling_path(DIALER_DLL_NAME),
    }
}

fn daemon_path() -> Result<PathBuf> {
    Ok(install_dir()?.join(DAEMON_EXE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dialer_path_prefers_override() {
        let path = resolve_dialer_path(Some(r"D:\custom\dialer.dll".to_string())).unwrap();
        assert_eq!(path, r"D:\custom\dialer.dll");
    }

    #[test]
    fn test_resolve_dialer_path_rejects_empty_override() {
        assert!(matches!(
            resolve_dialer_path(Some(String::new())),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_dialer_path_derives_from_install_dir() {
        let path = resolve_dialer_path(None).unwrap();
        assert!(path.ends_with(DIALER_DLL_NAME));
    }

    #[test]
    fn test_install_result_renderings() {
        let result = InstallResult {
            dialer_path: r"C:\dialsvc\dialsvc-dialer.dll".to_string(),
            dialer: RegistrationOutcome::Registered,
            store: "memory".to_string(),
            services: vec!["com.dialsvc.automatic".to_string()],
        };
        assert!(result.to_json().contains("\"dialer\":\"registered\""));
        let human = result.to_human();
        assert!(human.contains("Registered"));
        assert!(human.contains("com.dialsvc.automatic installed."));
    }

    #[test]
    fn test_remove_result_reports_best_effort_failure() {
        let result = RemoveResult {
            dialer_path: r"C:\dialsvc\dialsvc-dialer.dll".to_string(),
            dialer: None,
            dialer_error: Some("store open failed".to_string()),
            services: vec!["com.dialsvc.automatic".to_string()],
        };
        let human = result.to_human();
        assert!(human.contains("continuing: store open failed"));
        assert!(human.contains("com.dialsvc.automatic removed."));
        assert!(result.to_json().contains("\"dialer_error\""));
    }

    #[test]
    fn test_status_rendering_for_absent_value() {
        let result = DialerStatusResult {
            path: r"C:\dialsvc\dialsvc-dialer.dll".to_string(),
            registered: false,
            entries: Vec::new(),
            store: "memory".to_string(),
        };
        let human = result.to_human();
        assert!(human.contains("not registered"));
        assert!(human.contains("absent"));
    }
}
