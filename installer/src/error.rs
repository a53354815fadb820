//! Error types for the Volley installer.
//!
//! This module defines semantic error variants that provide actionable
//! guidance when installation fails. Every error is terminal for the current
//! invocation; nothing is retried internally.

use crate::artefact::download::DownloadError;
use crate::artefact::error::ArtefactError;
use crate::artefact::extraction::ExtractionError;
use crate::artefact::manifest_parser::ManifestParseError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during the installation process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// No artefact is published for the runtime platform, or the platform
    /// itself is outside the supported matrix.
    #[error("unsupported platform {platform}: {reason}")]
    UnsupportedPlatform {
        /// The rejected platform.
        platform: String,
        /// Why the platform was rejected.
        reason: String,
    },

    /// Fetching the artefact failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The downloaded bytes did not match the manifest digest.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}; nothing was installed")]
    ChecksumMismatch {
        /// The artefact URL.
        url: String,
        /// The digest recorded in the manifest.
        expected: String,
        /// The digest of the downloaded bytes.
        actual: String,
    },

    /// A manifest digest is not 64 lowercase hexadecimal characters.
    #[error("invalid checksum in release manifest: {reason}")]
    InvalidChecksum {
        /// Description of the problem.
        reason: String,
    },

    /// The release manifest is malformed.
    #[error("invalid release manifest: {reason}")]
    InvalidManifest {
        /// Description of the problem.
        reason: String,
    },

    /// The verified archive could not be unpacked.
    #[error("failed to unpack artefact: {0}")]
    Unpack(#[from] ExtractionError),

    /// Writing the executable to the install directory failed.
    #[error("failed to install to {path}: {reason}")]
    Install {
        /// The path being written.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// The installed executable did not run successfully.
    #[error("self-test of {path} failed: {reason}")]
    SelfTest {
        /// The installed executable.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration {path}: {reason}")]
    Config {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A path could not be determined or is not valid UTF-8.
    #[error("cannot determine {what}: {reason}")]
    PathResolution {
        /// The path being resolved.
        what: &'static str,
        /// Description of the failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ArtefactError> for InstallerError {
    fn from(err: ArtefactError) -> Self {
        match err {
            ArtefactError::UnsupportedPlatform { platform, reason } => {
                Self::UnsupportedPlatform { platform, reason }
            }
            ArtefactError::ChecksumMismatch {
                url,
                expected,
                actual,
            } => Self::ChecksumMismatch {
                url,
                expected,
                actual,
            },
            ArtefactError::InvalidSha256Digest { reason } => Self::InvalidChecksum { reason },
            other => Self::InvalidManifest {
                reason: other.to_string(),
            },
        }
    }
}

impl From<ManifestParseError> for InstallerError {
    fn from(err: ManifestParseError) -> Self {
        match err {
            ManifestParseError::Invalid(ArtefactError::InvalidSha256Digest { reason }) => {
                Self::InvalidChecksum { reason }
            }
            other => Self::InvalidManifest {
                reason: other.to_string(),
            },
        }
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_platform_maps_from_artefact_error() {
        let err: InstallerError = ArtefactError::UnsupportedPlatform {
            platform: "macos/riscv64".to_owned(),
            reason: "unknown CPU architecture".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            InstallerError::UnsupportedPlatform { ref platform, .. } if platform == "macos/riscv64"
        ));
    }

    #[test]
    fn checksum_mismatch_says_nothing_was_installed() {
        let err: InstallerError = ArtefactError::ChecksumMismatch {
            url: "https://example.test/volley.tar.gz".to_owned(),
            expected: "a".repeat(64),
            actual: "b".repeat(64),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("checksum mismatch"));
        assert!(msg.contains("nothing was installed"));
    }

    #[test]
    fn invalid_digest_maps_to_invalid_checksum() {
        let err: InstallerError = ArtefactError::InvalidSha256Digest {
            reason: "expected 64 hex characters, got 65".to_owned(),
        }
        .into();
        assert!(matches!(err, InstallerError::InvalidChecksum { .. }));
        assert!(err.to_string().contains("got 65"));
    }

    #[test]
    fn malformed_manifest_digest_maps_to_invalid_checksum() {
        let err: InstallerError = ManifestParseError::Invalid(ArtefactError::InvalidSha256Digest {
            reason: "contains uppercase characters".to_owned(),
        })
        .into();
        assert!(matches!(err, InstallerError::InvalidChecksum { .. }));
    }

    #[test]
    fn download_errors_keep_their_message() {
        let err = InstallerError::from(DownloadError::NotFound {
            url: "https://example.test/missing".to_owned(),
        });
        assert_eq!(err.to_string(), "artefact not found: https://example.test/missing");
    }

    #[test]
    fn install_error_includes_path() {
        let err = InstallerError::Install {
            path: Utf8PathBuf::from("/usr/local/bin/volley"),
            reason: "permission denied".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/usr/local/bin/volley"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn self_test_error_includes_reason() {
        let err = InstallerError::SelfTest {
            path: Utf8PathBuf::from("/tmp/bin/volley"),
            reason: "exited with status 2".to_owned(),
        };
        assert!(err.to_string().contains("exited with status 2"));
    }
}
