//! Executable staging into the install directory.
//!
//! This module writes verified executable bytes to
//! `<bin_dir>/volley` and marks the file executable. The installed name is
//! fixed; the platform-suffixed archive name never reaches the file system.

use crate::artefact::manifest::PlatformTarget;
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;

/// Permission bits applied to the installed executable on Unix.
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// An executable written to the host file system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledBinary {
    /// The artefact the executable came from.
    pub source_artifact: PlatformTarget,
    /// Directory holding the executable.
    pub install_path: Utf8PathBuf,
    /// File name of the executable.
    pub executable_name: String,
}

impl InstalledBinary {
    /// Return the full path to the installed executable.
    #[must_use]
    pub fn executable_path(&self) -> Utf8PathBuf {
        self.install_path.join(&self.executable_name)
    }
}

/// Handles writing executables into a target directory.
pub struct Stager {
    bin_dir: Utf8PathBuf,
}

impl Stager {
    /// Create a stager for `bin_dir`.
    #[must_use]
    pub const fn new(bin_dir: Utf8PathBuf) -> Self {
        Self { bin_dir }
    }

    /// Ensure the install directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Install`] if the directory cannot be
    /// created.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.bin_dir).map_err(|e| InstallerError::Install {
            path: self.bin_dir.clone(),
            reason: e.to_string(),
        })
    }

    /// Write `bytes` to `<bin_dir>/<executable_name>` and mark it executable.
    ///
    /// The bytes go to a hidden sibling file first, which is renamed over
    /// the destination once complete. Any existing file at that path is
    /// replaced, so staging the same bytes twice leaves one identical file.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Install`] if the directory is missing or
    /// not writable, or permissions cannot be set.
    pub fn stage(&self, bytes: &[u8], executable_name: &str) -> Result<Utf8PathBuf> {
        let dest_path = self.bin_dir.join(executable_name);
        let partial_path = self.bin_dir.join(format!(".{executable_name}.partial"));
        debug!("writing {} bytes to {dest_path}", bytes.len());

        let result = write_executable(&partial_path, bytes).and_then(|()| {
            fs::rename(&partial_path, &dest_path).map_err(|e| InstallerError::Install {
                path: dest_path.clone(),
                reason: e.to_string(),
            })
        });
        if result.is_err() && fs::remove_file(&partial_path).is_err() {
            debug!("no partial file to clean up at {partial_path}");
        }
        result?;

        Ok(dest_path)
    }
}

/// Write verified bytes as `executable_name` under `install_path`.
///
/// Creates `install_path` when missing.
///
/// # Errors
///
/// Returns [`InstallerError::Install`] if the directory cannot be created
/// or written.
pub fn install(
    source_artifact: &PlatformTarget,
    bytes: &[u8],
    install_path: &Utf8Path,
    executable_name: &str,
) -> Result<InstalledBinary> {
    let stager = Stager::new(install_path.to_owned());
    stager.prepare()?;
    stager.stage(bytes, executable_name)?;
    Ok(InstalledBinary {
        source_artifact: source_artifact.clone(),
        install_path: install_path.to_owned(),
        executable_name: executable_name.to_owned(),
    })
}

/// Return the default install directory for the current user.
///
/// # Errors
///
/// Returns [`InstallerError::PathResolution`] when no home directory is
/// known or the directory is not valid UTF-8.
pub fn default_bin_dir(dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    let dir = dirs.bin_dir().ok_or_else(|| InstallerError::PathResolution {
        what: "install directory",
        reason: "no home directory found; pass --bin-dir".to_owned(),
    })?;
    Utf8PathBuf::from_path_buf(dir).map_err(|path| InstallerError::PathResolution {
        what: "install directory",
        reason: format!("{} is not valid UTF-8", path.display()),
    })
}

fn write_executable(path: &Utf8Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| InstallerError::Install {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    make_executable(path)
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE)).map_err(|e| {
        InstallerError::Install {
            path: path.to_owned(),
            reason: format!("failed to set executable permission: {e}"),
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}
