//! Platform identification for prebuilt Volley artefacts.
//!
//! Releases publish one archive per (operating system, CPU architecture)
//! pair. Only macOS and Linux on amd64 and arm64 are supported; any other
//! value is rejected at parse time with
//! [`ArtefactError::UnsupportedPlatform`].

use super::error::{ArtefactError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Operating system family of a release artefact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Os {
    /// Apple macOS, published under the `darwin` name.
    #[serde(rename = "darwin")]
    MacOs,
    /// Linux.
    #[serde(rename = "linux")]
    Linux,
}

impl Os {
    /// Every supported operating system.
    pub const ALL: [Self; 2] = [Self::MacOs, Self::Linux];

    /// Return the name used in artefact filenames.
    ///
    /// # Examples
    ///
    /// ```
    /// use volley_installer::artefact::target::Os;
    ///
    /// assert_eq!(Os::MacOs.as_str(), "darwin");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MacOs => "darwin",
            Self::Linux => "linux",
        }
    }
}

impl FromStr for Os {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" | "osx" => Ok(Self::MacOs),
            "linux" => Ok(Self::Linux),
            _ => Err(ArtefactError::UnsupportedPlatform {
                platform: value.to_owned(),
                reason: format!("unknown operating system \"{value}\"; expected one of: darwin, linux"),
            }),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture of a release artefact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Arch {
    /// 64-bit x86 (`x86_64`).
    #[serde(rename = "amd64")]
    Amd64,
    /// 64-bit ARM (`aarch64`).
    #[serde(rename = "arm64")]
    Arm64,
}

impl Arch {
    /// Every supported CPU architecture.
    pub const ALL: [Self; 2] = [Self::Amd64, Self::Arm64];

    /// Return the name used in artefact filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

impl FromStr for Arch {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "amd64" | "x86_64" | "x64" => Ok(Self::Amd64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            _ => Err(ArtefactError::UnsupportedPlatform {
                platform: value.to_owned(),
                reason: format!("unknown CPU architecture \"{value}\"; expected one of: amd64, arm64"),
            }),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An (operating system, CPU architecture) pair.
///
/// # Examples
///
/// ```
/// use volley_installer::artefact::target::{Arch, Os, Platform};
///
/// let platform = Platform::parse("Linux", "aarch64").expect("supported platform");
/// assert_eq!(platform, Platform::new(Os::Linux, Arch::Arm64));
/// assert_eq!(platform.to_string(), "linux-arm64");
///
/// assert!(Platform::parse("macos", "riscv64").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Platform {
    os: Os,
    arch: Arch,
}

impl Platform {
    /// Create a platform from its components.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Parse a platform from free-form OS and architecture names.
    ///
    /// Accepts both artefact-style names (`darwin`, `amd64`) and Rust-style
    /// names (`macos`, `x86_64`), case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::UnsupportedPlatform`] naming the full pair
    /// when either component is unknown.
    pub fn parse(os: &str, arch: &str) -> Result<Self> {
        let pair = format!("{os}/{arch}");
        let parsed_os = os.parse::<Os>().map_err(|err| with_platform(err, &pair))?;
        let parsed_arch = arch
            .parse::<Arch>()
            .map_err(|err| with_platform(err, &pair))?;
        Ok(Self::new(parsed_os, parsed_arch))
    }

    /// Return every supported platform.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Os::ALL
            .iter()
            .flat_map(|os| Arch::ALL.iter().map(move |arch| Self::new(*os, *arch)))
            .collect()
    }

    /// Return the operating system.
    #[must_use]
    pub const fn os(self) -> Os {
        self.os
    }

    /// Return the CPU architecture.
    #[must_use]
    pub const fn arch(self) -> Arch {
        self.arch
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

fn with_platform(err: ArtefactError, pair: &str) -> ArtefactError {
    match err {
        ArtefactError::UnsupportedPlatform { reason, .. } => ArtefactError::UnsupportedPlatform {
            platform: pair.to_owned(),
            reason,
        },
        other => other,
    }
}
