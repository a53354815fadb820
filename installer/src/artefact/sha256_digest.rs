//! SHA-256 digest newtype for artefact verification.
//!
//! Validates that the value is a 64-character lowercase hexadecimal string
//! representing a 256-bit hash digest. Malformed lengths are rejected rather
//! than truncated, so a 65-character checksum in a manifest is an error.

use super::error::{ArtefactError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// A validated hex-encoded SHA-256 digest string.
///
/// # Examples
///
/// ```
/// use volley_installer::artefact::sha256_digest::Sha256Digest;
///
/// let hex = "a".repeat(64);
/// let digest: Sha256Digest = hex.as_str().try_into().unwrap();
/// assert_eq!(digest.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Compute the digest of `bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use volley_installer::artefact::sha256_digest::Sha256Digest;
    ///
    /// let digest = Sha256Digest::of(b"");
    /// assert_eq!(
    ///     digest.as_str(),
    ///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    /// );
    /// ```
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        // sha2 always renders 64 lowercase hex characters.
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha256(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        validate_sha256(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed hex-encoded SHA-256 digest.
fn validate_sha256(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: "digest is empty".to_owned(),
        });
    }
    if value.len() != DIGEST_HEX_LEN {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: "digest must be lowercase".to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LINUX_ARM64_DIGEST: &str =
        "f8283b9ad017094b1cc4962d12e1052fb5e92ae2244b98c38c86ef36cbfbe1bf";

    #[test]
    fn accepts_published_digest() {
        let digest = Sha256Digest::try_from(LINUX_ARM64_DIGEST).expect("valid digest");
        assert_eq!(digest.as_str(), LINUX_ARM64_DIGEST);
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("abcdef")]
    #[case::sixty_five_chars(concat!(
        "f8283b9ad017094b1cc4962d12e1052fb5e92ae2244b98c38c86ef36cbfbe1bf",
        "0"
    ))]
    #[case::non_hex(concat!(
        "g8283b9ad017094b1cc4962d12e1052fb5e92ae2244b98c38c86ef36cbfbe1bf"
    ))]
    fn rejects_malformed_digests(#[case] value: &str) {
        let result = Sha256Digest::try_from(value);
        assert!(
            matches!(result, Err(ArtefactError::InvalidSha256Digest { .. })),
            "expected rejection of {value:?}, got {result:?}"
        );
    }

    #[test]
    fn rejects_uppercase_hex() {
        let upper = LINUX_ARM64_DIGEST.to_ascii_uppercase();
        let result = Sha256Digest::try_from(upper.as_str());
        assert!(result.is_err());
    }

    #[test]
    fn sixty_five_char_reason_reports_length() {
        let long = format!("{LINUX_ARM64_DIGEST}a");
        let err = Sha256Digest::try_from(long).expect_err("65 chars rejected");
        assert!(err.to_string().contains("got 65"));
    }

    #[test]
    fn computed_digest_is_valid() {
        let digest = Sha256Digest::of(b"volley");
        assert!(Sha256Digest::try_from(digest.as_str()).is_ok());
    }

    #[test]
    fn display_shows_full_digest() {
        let digest = Sha256Digest::try_from(LINUX_ARM64_DIGEST).expect("known good");
        assert_eq!(format!("{digest}"), LINUX_ARM64_DIGEST);
    }
}
