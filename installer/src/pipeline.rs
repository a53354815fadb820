//! Install pipeline as a sequence of one-way states.
//!
//! Each stage consumes the previous one, so an artefact cannot be
//! installed before it has been verified, and cannot be reported as
//! working before its self-test has passed:
//!
//! ```text
//! ReleaseManifest --resolve--> Resolved --fetch_and_verify--> Fetched
//!     --install--> Installed --self_test--> Verified
//! ```
//!
//! On any failure the caller starts again from the manifest. The free
//! functions [`resolve`] and [`fetch_and_verify`] expose the individual
//! steps for callers that do not need the typestate wrappers.

use crate::artefact::download::ArtefactDownloader;
use crate::artefact::extraction::ArtefactExtractor;
use crate::artefact::manifest::{PlatformTarget, ReleaseManifest};
use crate::artefact::target::Platform;
use crate::artefact::verification::{VerifiedArtefact, verify_artefact};
use crate::error::Result;
use crate::self_test::{CommandExecutor, self_test};
use crate::stager::{InstalledBinary, install};
use camino::Utf8Path;
use log::debug;
use semver::Version;
use std::time::Duration;

/// Select the artefact published for `runtime_os`/`runtime_arch`.
///
/// Names are matched case-insensitively and accept common aliases such as
/// `macos` or `x86_64`.
///
/// # Errors
///
/// Returns [`crate::error::InstallerError::UnsupportedPlatform`] when the
/// names do not denote a supported platform or the manifest publishes no
/// artefact for it.
///
/// # Examples
///
/// ```
/// use volley_installer::artefact::manifest_parser::bundled_manifest;
/// use volley_installer::pipeline::resolve;
///
/// let manifest = bundled_manifest().expect("bundled manifest");
/// let target = resolve(&manifest, "linux", "arm64").expect("published");
/// assert!(target.artifact_url().ends_with("/volley-linux-arm64.tar.gz"));
///
/// assert!(resolve(&manifest, "macos", "riscv64").is_err());
/// ```
pub fn resolve(
    manifest: &ReleaseManifest,
    runtime_os: &str,
    runtime_arch: &str,
) -> Result<PlatformTarget> {
    Ok(manifest.resolve_named(runtime_os, runtime_arch)?.clone())
}

/// Download the artefact for `target` and check its SHA-256 digest.
///
/// # Errors
///
/// Returns [`crate::error::InstallerError::Download`] on transfer failure
/// and [`crate::error::InstallerError::ChecksumMismatch`] when the bytes do
/// not match; mismatched bytes are dropped.
pub fn fetch_and_verify(
    downloader: &dyn ArtefactDownloader,
    target: &PlatformTarget,
) -> Result<VerifiedArtefact> {
    let bytes = downloader.fetch(target.artifact_url())?;
    debug!(
        "verifying {} bytes against {}",
        bytes.len(),
        target.expected_checksum()
    );
    Ok(verify_artefact(target, bytes)?)
}

/// An artefact selected for the runtime platform.
#[derive(Debug, Clone)]
pub struct Resolved {
    version: Version,
    target: PlatformTarget,
}

impl Resolved {
    /// Resolve from runtime OS and architecture names.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn from_names(manifest: &ReleaseManifest, runtime_os: &str, runtime_arch: &str) -> Result<Self> {
        Ok(Self {
            version: manifest.version().clone(),
            target: resolve(manifest, runtime_os, runtime_arch)?,
        })
    }

    /// Resolve for an already parsed platform.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::InstallerError::UnsupportedPlatform`] when
    /// the manifest publishes no artefact for `platform`.
    pub fn for_platform(manifest: &ReleaseManifest, platform: Platform) -> Result<Self> {
        Ok(Self {
            version: manifest.version().clone(),
            target: manifest.resolve(platform)?.clone(),
        })
    }

    /// Return the release version.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Return the selected target.
    #[must_use]
    pub const fn target(&self) -> &PlatformTarget {
        &self.target
    }

    /// Download and verify the artefact.
    ///
    /// # Errors
    ///
    /// See [`fetch_and_verify`].
    pub fn fetch_and_verify(self, downloader: &dyn ArtefactDownloader) -> Result<Fetched> {
        let artefact = fetch_and_verify(downloader, &self.target)?;
        Ok(Fetched {
            version: self.version,
            artefact,
        })
    }
}

/// Verified archive bytes held in memory.
#[derive(Debug)]
pub struct Fetched {
    version: Version,
    artefact: VerifiedArtefact,
}

impl Fetched {
    /// Return the verified artefact.
    #[must_use]
    pub const fn artefact(&self) -> &VerifiedArtefact {
        &self.artefact
    }

    /// Unpack the executable and write it to `install_path`.
    ///
    /// Nothing is written when the archive cannot be unpacked.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::InstallerError::Unpack`] for archives without
    /// the executable or with unsafe entry paths, and
    /// [`crate::error::InstallerError::Install`] when writing fails.
    pub fn install(
        self,
        extractor: &dyn ArtefactExtractor,
        install_path: &Utf8Path,
        executable_name: &str,
    ) -> Result<Installed> {
        let (target, archive) = self.artefact.into_parts();
        let executable = extractor.extract_executable(&archive, executable_name)?;
        let binary = install(&target, &executable, install_path, executable_name)?;
        Ok(Installed {
            version: self.version,
            binary,
        })
    }
}

/// An executable written to disk but not yet exercised.
#[derive(Debug)]
pub struct Installed {
    version: Version,
    binary: InstalledBinary,
}

impl Installed {
    /// Return the installed executable.
    #[must_use]
    pub const fn binary(&self) -> &InstalledBinary {
        &self.binary
    }

    /// Run the executable's `--version` check.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::InstallerError::SelfTest`] when the
    /// executable fails to run, exits non-zero, or times out.
    pub fn self_test(self, executor: &dyn CommandExecutor, timeout: Duration) -> Result<Verified> {
        let reported_version = self_test(
            executor,
            &self.binary.install_path,
            &self.binary.executable_name,
            timeout,
        )?;
        Ok(Verified {
            version: self.version,
            binary: self.binary,
            reported_version: Some(reported_version),
        })
    }

    /// Accept the installation without running the executable.
    #[must_use]
    pub fn skip_self_test(self) -> Verified {
        Verified {
            version: self.version,
            binary: self.binary,
            reported_version: None,
        }
    }
}

/// A completed installation.
#[derive(Debug)]
pub struct Verified {
    version: Version,
    binary: InstalledBinary,
    reported_version: Option<String>,
}

impl Verified {
    /// Return the release version that was installed.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Return the installed executable.
    #[must_use]
    pub const fn binary(&self) -> &InstalledBinary {
        &self.binary
    }

    /// Return the first line printed by `--version`, if the self-test ran.
    #[must_use]
    pub fn reported_version(&self) -> Option<&str> {
        self.reported_version.as_deref()
    }

    /// Consume the state and return the installed executable.
    #[must_use]
    pub fn into_binary(self) -> InstalledBinary {
        self.binary
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
