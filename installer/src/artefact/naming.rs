//! Artefact naming policy for Volley release archives.
//!
//! Every release publishes `volley-<os>-<arch>.tar.gz` under
//! `https://github.com/volleyhq/volley-cli/releases/download/v<version>/`.
//! The archive name carries the platform; the installed executable does not.

use super::target::Platform;
use semver::Version;
use std::fmt;

/// Base URL for GitHub release downloads of the Volley CLI.
pub const RELEASE_DOWNLOAD_BASE: &str = "https://github.com/volleyhq/volley-cli/releases/download";

/// The fixed name of the installed executable.
pub const EXECUTABLE_NAME: &str = "volley";

/// The fixed file extension for release archives.
const ARTEFACT_EXTENSION: &str = ".tar.gz";

/// The archive filename for one platform.
///
/// # Examples
///
/// ```
/// use volley_installer::artefact::naming::ArtefactName;
/// use volley_installer::artefact::target::{Arch, Os, Platform};
///
/// let name = ArtefactName::new(Platform::new(Os::Linux, Arch::Arm64));
/// assert_eq!(name.to_string(), "volley-linux-arm64.tar.gz");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtefactName {
    platform: Platform,
}

impl ArtefactName {
    /// Create the artefact name for `platform`.
    #[must_use]
    pub const fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Return the filename as an owned string.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }

    /// Return the release download URL for this artefact at `version`.
    ///
    /// # Examples
    ///
    /// ```
    /// use semver::Version;
    /// use volley_installer::artefact::naming::ArtefactName;
    /// use volley_installer::artefact::target::{Arch, Os, Platform};
    ///
    /// let name = ArtefactName::new(Platform::new(Os::MacOs, Arch::Amd64));
    /// let url = name.release_url(&Version::new(0, 1, 2));
    /// assert!(url.ends_with("/v0.1.2/volley-darwin-amd64.tar.gz"));
    /// ```
    #[must_use]
    pub fn release_url(&self, version: &Version) -> String {
        format!("{RELEASE_DOWNLOAD_BASE}/v{version}/{self}")
    }
}

impl fmt::Display for ArtefactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{EXECUTABLE_NAME}-{}-{}{ARTEFACT_EXTENSION}",
            self.platform.os(),
            self.platform.arch()
        )
    }
}

/// Return the final path segment of an artefact URL.
///
/// Query strings and fragments are ignored.
#[must_use]
pub fn filename_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}
