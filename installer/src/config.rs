//! Installer configuration file.
//!
//! Defaults for the install command live in an optional
//! `config.toml` under the platform config directory. Every key is
//! optional; command-line flags take precedence over file values.
//!
//! ```toml
//! bin_dir = "/opt/volley/bin"
//! download_timeout_secs = 120
//! self_test_timeout_secs = 5
//! skip_self_test = false
//! ```

use crate::artefact::download::DEFAULT_DOWNLOAD_TIMEOUT;
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use crate::self_test::DEFAULT_SELF_TEST_TIMEOUT;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings read from `config.toml`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    /// Directory to install the executable into.
    pub bin_dir: Option<Utf8PathBuf>,
    /// Download timeout in seconds.
    pub download_timeout_secs: u64,
    /// Self-test timeout in seconds.
    pub self_test_timeout_secs: u64,
    /// Skip the post-install `--version` check.
    pub skip_self_test: bool,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            bin_dir: None,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT.as_secs(),
            self_test_timeout_secs: DEFAULT_SELF_TEST_TIMEOUT.as_secs(),
            skip_self_test: false,
        }
    }
}

impl InstallerConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Config`] for malformed TOML, unknown keys,
    /// or zero timeouts.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use volley_installer::config::InstallerConfig;
    ///
    /// let config = InstallerConfig::from_toml("skip_self_test = true", Utf8Path::new("config.toml"))
    ///     .expect("valid config");
    /// assert!(config.skip_self_test);
    /// assert_eq!(config.download_timeout_secs, 60);
    /// ```
    pub fn from_toml(text: &str, origin: &Utf8Path) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|err| InstallerError::Config {
            path: origin.to_owned(),
            reason: err.to_string(),
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    /// Load configuration from `explicit`, or from the default location.
    ///
    /// An explicit path must exist. The default file is optional: when it is
    /// absent, built-in defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Config`] if a file that should be read
    /// cannot be read or parsed.
    pub fn load(explicit: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        let Some(path) = default_config_path(dirs) else {
            debug!("no config directory available; using defaults");
            return Ok(Self::default());
        };
        if path.is_file() {
            Self::read(&path)
        } else {
            debug!("no config file at {path}; using defaults");
            Ok(Self::default())
        }
    }

    /// Return the download timeout.
    #[must_use]
    pub const fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Return the self-test timeout.
    #[must_use]
    pub const fn self_test_timeout(&self) -> Duration {
        Duration::from_secs(self.self_test_timeout_secs)
    }

    fn read(path: &Utf8Path) -> Result<Self> {
        debug!("reading config from {path}");
        let text = std::fs::read_to_string(path).map_err(|err| InstallerError::Config {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;
        Self::from_toml(&text, path)
    }

    fn validate(&self, origin: &Utf8Path) -> Result<()> {
        if self.download_timeout_secs == 0 || self.self_test_timeout_secs == 0 {
            return Err(InstallerError::Config {
                path: origin.to_owned(),
                reason: "timeouts must be at least one second".to_owned(),
            });
        }
        Ok(())
    }
}

/// Return the default config file path, if it can be represented.
#[must_use]
pub fn default_config_path(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    dirs.config_dir()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .map(|dir| dir.join(CONFIG_FILE_NAME))
}
