//! Error types for release manifests, platforms, and artefact verification.
//!
//! Each variant provides a descriptive message identifying the invalid input
//! and the constraint that was violated.

use thiserror::Error;

/// Errors arising from invalid artefact-related values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// The platform cannot be parsed, or no artefact is published for it.
    #[error("unsupported platform \"{platform}\": {reason}")]
    UnsupportedPlatform {
        /// The rejected platform, as `os/arch` or a single component.
        platform: String,
        /// Description of why the platform was rejected.
        reason: String,
    },

    /// A SHA-256 digest is not a valid 64-character lowercase hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// The release version is not a valid semantic version.
    #[error("invalid release version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// An artefact URL is empty or does not use HTTPS.
    #[error("invalid artefact URL \"{url}\": {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The same platform appears more than once in a manifest.
    #[error("duplicate target for platform {platform}")]
    DuplicateTarget {
        /// The platform listed twice.
        platform: String,
    },

    /// A manifest declares no platform targets at all.
    #[error("release {version} declares no platform targets")]
    EmptyManifest {
        /// The release version of the empty manifest.
        version: String,
    },

    /// The downloaded bytes do not hash to the expected digest.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The artefact URL the bytes were fetched from.
        url: String,
        /// The digest recorded in the manifest.
        expected: String,
        /// The digest computed over the downloaded bytes.
        actual: String,
    },
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;
