//! Manifest deserialization from TOML.
//!
//! Release manifests are small TOML documents: a `version` and an array of
//! `[[targets]]` tables. Every field is validated while converting into the
//! domain types, so a malformed checksum or unknown platform is rejected at
//! load time rather than at install time.

use super::error::ArtefactError;
use super::manifest::{PlatformTarget, ReleaseManifest, parse_version};
use super::sha256_digest::Sha256Digest;
use super::target::Platform;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// The manifest compiled into the installer binary.
const BUNDLED_MANIFEST: &str = include_str!("../../manifests/volley.toml");

/// Errors arising from manifest loading and parsing.
#[derive(Debug, thiserror::Error)]
pub enum ManifestParseError {
    /// TOML deserialization failed.
    #[error("manifest parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A field failed validation.
    #[error("invalid manifest: {0}")]
    Invalid(#[from] ArtefactError),

    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Read {
        /// Path to the manifest file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    version: String,
    #[serde(default)]
    targets: Vec<RawTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    os: String,
    arch: String,
    sha256: String,
    url: Option<String>,
}

/// Parse a TOML string into a validated [`ReleaseManifest`].
///
/// Targets without a `url` use the release download template.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or any field fails
/// validation (unknown platform, malformed digest, duplicate target).
///
/// # Examples
///
/// ```
/// use volley_installer::artefact::manifest_parser::parse_manifest;
///
/// let toml = concat!(
///     "version = \"0.1.2\"\n",
///     "[[targets]]\n",
///     "os = \"linux\"\n",
///     "arch = \"amd64\"\n",
///     "sha256 = \"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\"\n",
/// );
/// let manifest = parse_manifest(toml).expect("valid manifest");
/// assert_eq!(manifest.version().to_string(), "0.1.2");
/// ```
pub fn parse_manifest(toml_text: &str) -> Result<ReleaseManifest, ManifestParseError> {
    let raw: RawManifest = toml::from_str(toml_text)?;
    let version = parse_version(&raw.version)?;
    let targets = raw
        .targets
        .into_iter()
        .map(|target| convert_target(&version, target))
        .collect::<Result<Vec<_>, ArtefactError>>()?;
    Ok(ReleaseManifest::new(version, targets)?)
}

/// Read and parse a manifest file.
///
/// # Errors
///
/// Returns [`ManifestParseError::Read`] if the file cannot be read, or any
/// error from [`parse_manifest`].
pub fn load_manifest(path: &Utf8Path) -> Result<ReleaseManifest, ManifestParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestParseError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse_manifest(&text)
}

/// Return the manifest bundled with this installer.
///
/// # Errors
///
/// Returns an error only if the bundled manifest is malformed.
pub fn bundled_manifest() -> Result<ReleaseManifest, ManifestParseError> {
    parse_manifest(BUNDLED_MANIFEST)
}

fn convert_target(
    version: &semver::Version,
    raw: RawTarget,
) -> Result<PlatformTarget, ArtefactError> {
    let platform = Platform::parse(&raw.os, &raw.arch)?;
    let sha256 = Sha256Digest::try_from(raw.sha256)?;
    match raw.url {
        Some(url) => PlatformTarget::new(platform, url, sha256),
        None => Ok(PlatformTarget::templated(version, platform, sha256)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::target::{Arch, Os};
    use rstest::rstest;

    const DIGEST: &str = "f8283b9ad017094b1cc4962d12e1052fb5e92ae2244b98c38c86ef36cbfbe1bf";

    fn manifest_with(target_fields: &str) -> String {
        format!("version = \"0.1.2\"\n\n[[targets]]\n{target_fields}")
    }

    #[test]
    fn bundled_manifest_parses() {
        let manifest = bundled_manifest().expect("bundled manifest is valid");
        assert_eq!(manifest.version().to_string(), "0.1.2");
        let target = manifest
            .resolve(Platform::new(Os::Linux, Arch::Arm64))
            .expect("linux-arm64 published");
        assert_eq!(target.expected_checksum().as_str(), DIGEST);
        assert_eq!(target.artefact_filename(), "volley-linux-arm64.tar.gz");
    }

    #[test]
    fn explicit_url_is_kept() {
        let toml = manifest_with(&format!(
            "os = \"darwin\"\narch = \"arm64\"\nsha256 = \"{DIGEST}\"\nurl = \"https://mirror.test/volley.tgz\"\n"
        ));
        let manifest = parse_manifest(&toml).expect("valid");
        let target = manifest
            .resolve(Platform::new(Os::MacOs, Arch::Arm64))
            .expect("published");
        assert_eq!(target.artifact_url(), "https://mirror.test/volley.tgz");
    }

    #[rstest]
    #[case::sixty_five_char_digest(format!(
        "os = \"linux\"\narch = \"amd64\"\nsha256 = \"{DIGEST}b\"\n"
    ))]
    #[case::empty_digest("os = \"linux\"\narch = \"amd64\"\nsha256 = \"\"\n".to_owned())]
    #[case::unknown_arch(format!(
        "os = \"linux\"\narch = \"riscv64\"\nsha256 = \"{DIGEST}\"\n"
    ))]
    #[case::plain_http(format!(
        "os = \"linux\"\narch = \"amd64\"\nsha256 = \"{DIGEST}\"\nurl = \"http://insecure.test/v.tar.gz\"\n"
    ))]
    fn rejects_invalid_targets(#[case] fields: String) {
        let result = parse_manifest(&manifest_with(&fields));
        assert!(
            matches!(result, Err(ManifestParseError::Invalid(_))),
            "expected validation failure, got {result:?}"
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let toml = manifest_with(&format!(
            "os = \"linux\"\narch = \"amd64\"\nsha256 = \"{DIGEST}\"\nmd5 = \"abc\"\n"
        ));
        let result = parse_manifest(&toml);
        assert!(matches!(result, Err(ManifestParseError::Toml(_))));
    }

    #[test]
    fn rejects_manifest_without_targets() {
        let result = parse_manifest("version = \"0.1.2\"\n");
        assert!(matches!(
            result,
            Err(ManifestParseError::Invalid(ArtefactError::EmptyManifest { .. }))
        ));
    }

    #[test]
    fn load_manifest_reports_missing_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().join("missing.toml")).expect("UTF-8 path");
        let result = load_manifest(&path);
        assert!(matches!(result, Err(ManifestParseError::Read { .. })));
    }
}
