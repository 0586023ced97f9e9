//! Launches a downloaded update package.
//!
//! - Windows: runs the installer executable with `--updated`
//! - macOS: hands the package to `open`
//! - Linux: marks an AppImage executable and runs it; anything else goes
//!   to `xdg-open`

use std::path::Path;
use std::process::Command;

use roomdesk_updater::{DownloadedUpdate, Installer, UpdateError};
use tracing::info;

/// Spawns the platform installer and returns without waiting for it.
pub struct ProcessInstaller;

impl Installer for ProcessInstaller {
    fn install(&self, update: &DownloadedUpdate) -> Result<(), UpdateError> {
        if !update.path.is_file() {
            return Err(UpdateError::Install(format!(
                "update package missing: {}",
                update.path.display()
            )));
        }
        let mut command = install_command(&update.path)?;
        command
            .spawn()
            .map_err(|e| UpdateError::Install(format!("failed to launch installer: {e}")))?;
        info!(version = %update.version, path = %update.path.display(), "Installer launched");
        Ok(())
    }
}

#[cfg(target_os = "windows")]
fn install_command(path: &Path) -> Result<Command, UpdateError> {
    let mut command = Command::new(path);
    command.arg("--updated");
    Ok(command)
}

#[cfg(target_os = "macos")]
fn install_command(path: &Path) -> Result<Command, UpdateError> {
    let mut command = Command::new("open");
    command.arg(path);
    Ok(command)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn install_command(path: &Path) -> Result<Command, UpdateError> {
    use std::os::unix::fs::PermissionsExt;

    if is_appimage(path) {
        let mut permissions = std::fs::metadata(path)?.permissions();
        permissions.set_mode(permissions.mode() | 0o755);
        std::fs::set_permissions(path, permissions)?;
        return Ok(Command::new(path));
    }
    let mut command = Command::new("xdg-open");
    command.arg(path);
    Ok(command)
}

#[cfg(not(any(unix, target_os = "windows")))]
fn install_command(path: &Path) -> Result<Command, UpdateError> {
    Err(UpdateError::Install(format!(
        "no installer for this platform: {}",
        path.display()
    )))
}

#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn is_appimage(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("appimage"))
}
