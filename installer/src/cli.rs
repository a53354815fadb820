//! CLI argument definitions for the Volley installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::config::InstallerConfig;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

/// Download, verify, and install the Volley CLI.
#[derive(Parser, Debug)]
#[command(name = "volley-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download, verify, and install the Volley CLI.\n\n",
    "The installer selects the release archive for this machine from a ",
    "release manifest, checks its SHA-256 digest, unpacks the `volley` ",
    "executable into a binary directory, and runs `volley --version` to ",
    "confirm it works. Nothing is written when the digest does not match.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install the bundled release into ~/.local/bin:\n",
    "    $ volley-installer\n\n",
    "  Install into a custom directory:\n",
    "    $ volley-installer install --bin-dir /opt/volley/bin\n\n",
    "  Use a manifest with additional platforms:\n",
    "    $ volley-installer install --manifest volley-0.1.2.toml\n\n",
    "  Show the artefact selected for another platform:\n",
    "    $ volley-installer resolve --os darwin --arch arm64\n\n",
    "  List every artefact in the manifest as JSON:\n",
    "    $ volley-installer show --json\n\n",
    "  Preview without downloading:\n",
    "    $ volley-installer --dry-run",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install the Volley CLI (default when no subcommand given).
    Install(InstallArgs),

    /// Print the artefact URL and checksum for a platform.
    Resolve(ResolveArgs),

    /// List every artefact in the release manifest.
    Show(ShowArgs),
}

/// Release manifest and platform selection shared by several commands.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    /// Read the release manifest from FILE instead of the bundled one.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Operating system to select [default: this machine].
    #[arg(long, value_name = "OS")]
    pub os: Option<String>,

    /// CPU architecture to select [default: this machine].
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,
}

/// Arguments for the install command.
#[derive(Args, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Manifest and platform selection.
    #[command(flatten)]
    pub target: TargetArgs,

    /// Directory to install `volley` into [default: platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub bin_dir: Option<Utf8PathBuf>,

    /// Do not run `volley --version` after installing.
    #[arg(long)]
    pub skip_self_test: bool,

    /// Show what would be installed and exit without downloading.
    #[arg(long)]
    pub dry_run: bool,

    /// Download timeout in seconds [default: 60].
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Read settings from FILE instead of the default config location.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,
}

/// Arguments for the resolve command.
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Manifest and platform selection.
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for the show command.
#[derive(Args, Debug, Clone, Default)]
pub struct ShowArgs {
    /// Read the release manifest from FILE instead of the bundled one.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

impl InstallArgs {
    /// Return the download timeout, preferring `--timeout` over `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use volley_installer::cli::InstallArgs;
    /// use volley_installer::config::InstallerConfig;
    ///
    /// let config = InstallerConfig::default();
    /// assert_eq!(InstallArgs::default().download_timeout(&config), Duration::from_secs(60));
    ///
    /// let args = InstallArgs { timeout: Some(5), ..InstallArgs::default() };
    /// assert_eq!(args.download_timeout(&config), Duration::from_secs(5));
    /// ```
    #[must_use]
    pub fn download_timeout(&self, config: &InstallerConfig) -> Duration {
        self.timeout
            .map_or_else(|| config.download_timeout(), Duration::from_secs)
    }

    /// Return the install directory from `--bin-dir` or `config`, if set.
    #[must_use]
    pub fn bin_dir_override(&self, config: &InstallerConfig) -> Option<Utf8PathBuf> {
        self.bin_dir.clone().or_else(|| config.bin_dir.clone())
    }

    /// Return true when either the flag or `config` disables the self-test.
    #[must_use]
    pub const fn skips_self_test(&self, config: &InstallerConfig) -> bool {
        self.skip_self_test || config.skip_self_test
    }
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened install arguments.
    ///
    /// # Note
    ///
    /// When `Resolve` or `Show` is active, this returns the default
    /// flattened install arguments. Callers should check `self.command`
    /// first if those cases need different handling.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::Resolve(_) | Command::Show(_)) | None => &self.install,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
