//! Directory resolution abstraction for platform-specific paths.
//!
//! Wraps `directories-next` behind a trait so that install and config
//! locations can be injected in tests.

use std::path::PathBuf;

/// Application directory name used under the platform config directory.
const APP_DIR: &str = "volley-installer";

/// Resolves the directories the installer reads from and writes to.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Directory the `volley` executable is installed into by default.
    ///
    /// Uses the platform executable directory where one exists (for
    /// example `~/.local/bin` under XDG), falling back to `~/.local/bin`
    /// beneath the home directory.
    fn bin_dir(&self) -> Option<PathBuf>;

    /// Directory holding the installer's `config.toml`.
    fn config_dir(&self) -> Option<PathBuf>;
}

/// Production directory resolver backed by `directories-next`.
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    dirs: Option<directories_next::BaseDirs>,
}

impl SystemBaseDirs {
    /// Create a resolver for the current user.
    ///
    /// Resolution is lazy: when no home directory can be found, every
    /// lookup returns `None`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dirs: directories_next::BaseDirs::new(),
        }
    }
}

impl Default for SystemBaseDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseDirs for SystemBaseDirs {
    fn bin_dir(&self) -> Option<PathBuf> {
        let dirs = self.dirs.as_ref()?;
        Some(
            dirs.executable_dir()
                .map_or_else(|| dirs.home_dir().join(".local").join("bin"), PathBuf::from),
        )
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.dirs
            .as_ref()
            .map(|dirs| dirs.config_dir().join(APP_DIR))
    }
}
