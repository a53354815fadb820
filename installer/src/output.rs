//! Output formatting for the installer CLI.
//!
//! Progress and results go to stderr via [`write_stderr_line`]; machine
//! readable listings (`resolve`, `show --json`) are returned as strings for
//! the caller to print on stdout.

use crate::artefact::manifest::{PlatformTarget, ReleaseManifest};
use camino::Utf8Path;
use serde::Serialize;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a success message after installation.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use semver::Version;
/// use volley_installer::output::success_message;
///
/// let msg = success_message(&Version::new(0, 1, 2), Utf8Path::new("/home/u/.local/bin/volley"));
/// assert_eq!(msg, "Installed volley 0.1.2 to /home/u/.local/bin/volley");
/// ```
#[must_use]
pub fn success_message(version: &semver::Version, executable_path: &Utf8Path) -> String {
    format!("Installed volley {version} to {executable_path}")
}

/// What an install would do, printed by `--dry-run`.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The selected artefact.
    pub target: &'a PlatformTarget,
    /// Release version.
    pub version: &'a semver::Version,
    /// Where the executable would be written.
    pub executable_path: &'a Utf8Path,
    /// Whether the self-test would run.
    pub self_test: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        [
            "Dry run - nothing will be downloaded or written".to_owned(),
            String::new(),
            format!("Version: {}", self.version),
            format!("Platform: {}", self.target.platform()),
            format!("Artefact: {}", self.target.artifact_url()),
            format!("SHA-256: {}", self.target.expected_checksum()),
            format!("Install path: {}", self.executable_path),
            format!("Self-test: {}", if self.self_test { "yes" } else { "no" }),
        ]
        .join("\n")
    }
}

/// Format one resolved target as `url` and `sha256` lines.
#[must_use]
pub fn format_resolution(target: &PlatformTarget) -> String {
    format!(
        "url: {}\nsha256: {}",
        target.artifact_url(),
        target.expected_checksum()
    )
}

/// Format every target of `manifest` as an aligned table.
#[must_use]
pub fn format_targets_human(manifest: &ReleaseManifest) -> String {
    let mut output = format!("Volley {}\n", manifest.version());
    for target in manifest.targets() {
        output.push_str(&format!(
            "\n  {:<13} {}\n  {:<13} {}\n",
            target.platform(),
            target.artifact_url(),
            "",
            target.expected_checksum()
        ));
    }
    output
}

/// Format every target of `manifest` as pretty-printed JSON.
///
/// # Examples
///
/// ```
/// use volley_installer::artefact::manifest_parser::bundled_manifest;
/// use volley_installer::output::format_targets_json;
///
/// let manifest = bundled_manifest().expect("bundled manifest");
/// let json = format_targets_json(&manifest);
/// assert!(json.contains("\"targets\""));
/// ```
#[must_use]
pub fn format_targets_json(manifest: &ReleaseManifest) -> String {
    let json_data = ManifestJson {
        version: manifest.version().to_string(),
        targets: manifest.targets().collect(),
    };
    serde_json::to_string_pretty(&json_data).unwrap_or_else(|_| "{}".to_owned())
}

#[derive(Debug, Serialize)]
struct ManifestJson<'a> {
    version: String,
    targets: Vec<&'a PlatformTarget>,
}
