//! Release manifest types.
//!
//! A [`ReleaseManifest`] is the versioned set of known artefact locations
//! and checksums for one Volley release. Targets are keyed by [`Platform`],
//! so resolving the runtime platform is a map lookup and a manifest cannot
//! hold two targets for the same pair.

use super::error::{ArtefactError, Result};
use super::naming::{ArtefactName, filename_from_url};
use super::sha256_digest::Sha256Digest;
use super::target::{Arch, Os, Platform};
use semver::Version;
use serde::Serialize;
use std::collections::BTreeMap;

/// One downloadable artefact for a single platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformTarget {
    #[serde(flatten)]
    platform: Platform,
    url: String,
    sha256: Sha256Digest,
}

impl PlatformTarget {
    /// Create a target with an explicit artefact URL.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::InvalidUrl`] when `url` is not an HTTPS URL
    /// naming a file.
    pub fn new(platform: Platform, url: impl Into<String>, sha256: Sha256Digest) -> Result<Self> {
        let url = url.into();
        validate_url(&url)?;
        Ok(Self {
            platform,
            url,
            sha256,
        })
    }

    /// Create a target whose URL follows the release download template.
    ///
    /// # Examples
    ///
    /// ```
    /// use semver::Version;
    /// use volley_installer::artefact::manifest::PlatformTarget;
    /// use volley_installer::artefact::sha256_digest::Sha256Digest;
    /// use volley_installer::artefact::target::{Arch, Os, Platform};
    ///
    /// let target = PlatformTarget::templated(
    ///     &Version::new(0, 1, 2),
    ///     Platform::new(Os::Linux, Arch::Amd64),
    ///     Sha256Digest::of(b"archive"),
    /// );
    /// assert_eq!(target.artefact_filename(), "volley-linux-amd64.tar.gz");
    /// ```
    #[must_use]
    pub fn templated(version: &Version, platform: Platform, sha256: Sha256Digest) -> Self {
        Self {
            platform,
            url: ArtefactName::new(platform).release_url(version),
            sha256,
        }
    }

    /// Return the target platform.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Return the operating system.
    #[must_use]
    pub const fn os(&self) -> Os {
        self.platform.os()
    }

    /// Return the CPU architecture.
    #[must_use]
    pub const fn arch(&self) -> Arch {
        self.platform.arch()
    }

    /// Return the artefact download URL.
    #[must_use]
    pub fn artifact_url(&self) -> &str {
        &self.url
    }

    /// Return the expected SHA-256 digest of the artefact bytes.
    #[must_use]
    pub const fn expected_checksum(&self) -> &Sha256Digest {
        &self.sha256
    }

    /// Return the archive filename, taken from the URL.
    #[must_use]
    pub fn artefact_filename(&self) -> &str {
        filename_from_url(&self.url)
    }
}

/// The versioned set of artefacts published for one release.
///
/// # Examples
///
/// ```
/// use semver::Version;
/// use volley_installer::artefact::manifest::{PlatformTarget, ReleaseManifest};
/// use volley_installer::artefact::sha256_digest::Sha256Digest;
/// use volley_installer::artefact::target::{Arch, Os, Platform};
///
/// let version = Version::new(0, 1, 2);
/// let platform = Platform::new(Os::Linux, Arch::Arm64);
/// let target = PlatformTarget::templated(&version, platform, Sha256Digest::of(b"x"));
/// let manifest = ReleaseManifest::new(version, [target]).expect("valid manifest");
///
/// let resolved = manifest.resolve_named("linux", "arm64").expect("published");
/// assert_eq!(resolved.artefact_filename(), "volley-linux-arm64.tar.gz");
/// assert!(manifest.resolve_named("darwin", "arm64").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseManifest {
    version: Version,
    targets: BTreeMap<Platform, PlatformTarget>,
}

impl ReleaseManifest {
    /// Build a manifest from a version and its platform targets.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::DuplicateTarget`] when two targets share a
    /// platform, or [`ArtefactError::EmptyManifest`] when there are none.
    pub fn new(version: Version, targets: impl IntoIterator<Item = PlatformTarget>) -> Result<Self> {
        let mut by_platform = BTreeMap::new();
        for target in targets {
            let platform = target.platform();
            if by_platform.insert(platform, target).is_some() {
                return Err(ArtefactError::DuplicateTarget {
                    platform: platform.to_string(),
                });
            }
        }
        if by_platform.is_empty() {
            return Err(ArtefactError::EmptyManifest {
                version: version.to_string(),
            });
        }
        Ok(Self {
            version,
            targets: by_platform,
        })
    }

    /// Return the release version.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Iterate over the targets in platform order.
    pub fn targets(&self) -> impl Iterator<Item = &PlatformTarget> {
        self.targets.values()
    }

    /// Select the target whose platform exactly matches `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::UnsupportedPlatform`] when the release has no
    /// artefact for `platform`.
    pub fn resolve(&self, platform: Platform) -> Result<&PlatformTarget> {
        self.targets
            .get(&platform)
            .ok_or_else(|| ArtefactError::UnsupportedPlatform {
                platform: platform.to_string(),
                reason: format!(
                    "release {} publishes artefacts for: {}",
                    self.version,
                    self.published_list()
                ),
            })
    }

    /// Parse runtime OS and architecture names, then resolve them.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::UnsupportedPlatform`] when either name is
    /// unknown or the release has no artefact for the pair.
    pub fn resolve_named(&self, os: &str, arch: &str) -> Result<&PlatformTarget> {
        self.resolve(Platform::parse(os, arch)?)
    }

    fn published_list(&self) -> String {
        self.targets
            .keys()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse a semantic version, tolerating a leading `v`.
///
/// # Errors
///
/// Returns [`ArtefactError::InvalidVersion`] when `value` is not semver.
pub fn parse_version(value: &str) -> Result<Version> {
    let trimmed = value.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(bare).map_err(|err| ArtefactError::InvalidVersion {
        value: value.to_owned(),
        reason: err.to_string(),
    })
}

fn validate_url(url: &str) -> Result<()> {
    if !url.starts_with("https://") {
        return Err(ArtefactError::InvalidUrl {
            url: url.to_owned(),
            reason: "artefact URLs must use https".to_owned(),
        });
    }
    if filename_from_url(url).is_empty() {
        return Err(ArtefactError::InvalidUrl {
            url: url.to_owned(),
            reason: "URL does not name a file".to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
