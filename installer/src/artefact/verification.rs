//! Checksum verification for downloaded artefacts.
//!
//! A [`VerifiedArtefact`] can only be obtained by hashing downloaded bytes
//! and matching them against the manifest digest, so code that installs
//! bytes cannot be handed an unverified archive.

use super::error::{ArtefactError, Result};
use super::manifest::PlatformTarget;
use super::sha256_digest::Sha256Digest;

/// Archive bytes whose SHA-256 matched the manifest.
#[derive(Debug, Clone)]
pub struct VerifiedArtefact {
    target: PlatformTarget,
    bytes: Vec<u8>,
}

impl VerifiedArtefact {
    /// Return the target the bytes were verified against.
    #[must_use]
    pub const fn target(&self) -> &PlatformTarget {
        &self.target
    }

    /// Return the verified archive bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the wrapper and return the target and bytes.
    #[must_use]
    pub fn into_parts(self) -> (PlatformTarget, Vec<u8>) {
        (self.target, self.bytes)
    }
}

/// Verify `bytes` against the digest recorded for `target`.
///
/// On mismatch the bytes are dropped.
///
/// # Errors
///
/// Returns [`ArtefactError::ChecksumMismatch`] when the computed digest
/// differs from the expected one.
///
/// # Examples
///
/// ```
/// use semver::Version;
/// use volley_installer::artefact::manifest::PlatformTarget;
/// use volley_installer::artefact::sha256_digest::Sha256Digest;
/// use volley_installer::artefact::target::{Arch, Os, Platform};
/// use volley_installer::artefact::verification::verify_artefact;
///
/// let platform = Platform::new(Os::Linux, Arch::Amd64);
/// let target = PlatformTarget::templated(
///     &Version::new(0, 1, 2),
///     platform,
///     Sha256Digest::of(b"archive"),
/// );
/// assert!(verify_artefact(&target, b"archive".to_vec()).is_ok());
/// assert!(verify_artefact(&target, b"tampered".to_vec()).is_err());
/// ```
pub fn verify_artefact(target: &PlatformTarget, bytes: Vec<u8>) -> Result<VerifiedArtefact> {
    let actual = Sha256Digest::of(&bytes);
    if &actual != target.expected_checksum() {
        return Err(ArtefactError::ChecksumMismatch {
            url: target.artifact_url().to_owned(),
            expected: target.expected_checksum().to_string(),
            actual: actual.into_inner(),
        });
    }
    Ok(VerifiedArtefact {
        target: target.clone(),
        bytes,
    })
}
