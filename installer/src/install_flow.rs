//! Install-flow helpers for the installer binary.
//!
//! This module turns CLI arguments and the config file into an
//! [`InstallPlan`], then drives the pipeline states with progress output.
//! Collaborators are passed in so the flow can run against stubs.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::io::Write;
use std::time::Duration;
use volley_installer::artefact::download::ArtefactDownloader;
use volley_installer::artefact::extraction::ArtefactExtractor;
use volley_installer::artefact::manifest::ReleaseManifest;
use volley_installer::artefact::manifest_parser::{bundled_manifest, load_manifest};
use volley_installer::artefact::naming::EXECUTABLE_NAME;
use volley_installer::cli::{InstallArgs, TargetArgs};
use volley_installer::config::InstallerConfig;
use volley_installer::dirs::BaseDirs;
use volley_installer::error::Result;
use volley_installer::output::{DryRunInfo, success_message, write_stderr_line};
use volley_installer::pipeline::{Resolved, Verified};
use volley_installer::self_test::CommandExecutor;
use volley_installer::stager::default_bin_dir;

/// Everything needed to perform one installation.
#[derive(Debug)]
pub(crate) struct InstallPlan {
    /// The artefact selected for the requested platform.
    pub(crate) resolved: Resolved,
    /// Directory the executable is written to.
    pub(crate) bin_dir: Utf8PathBuf,
    /// Bound on the download.
    pub(crate) download_timeout: Duration,
    /// Bound on `volley --version`; `None` skips the self-test.
    pub(crate) self_test_timeout: Option<Duration>,
    /// Suppress progress output.
    pub(crate) quiet: bool,
}

impl InstallPlan {
    fn executable_path(&self) -> Utf8PathBuf {
        self.bin_dir.join(EXECUTABLE_NAME)
    }
}

/// Collaborators that touch the network, archives, and processes.
pub(crate) struct InstallServices<'a> {
    /// Fetches artefact bytes.
    pub(crate) downloader: &'a dyn ArtefactDownloader,
    /// Reads the executable out of the archive.
    pub(crate) extractor: &'a dyn ArtefactExtractor,
    /// Runs the installed executable.
    pub(crate) executor: &'a dyn CommandExecutor,
}

/// Load the manifest from `path`, or the bundled one.
pub(crate) fn load_release_manifest(path: Option<&Utf8Path>) -> Result<ReleaseManifest> {
    let manifest = match path {
        Some(path) => {
            debug!("loading manifest from {path}");
            load_manifest(path)?
        }
        None => bundled_manifest()?,
    };
    Ok(manifest)
}

/// Resolve the artefact named by `--manifest`, `--os`, and `--arch`.
///
/// Missing platform components default to this machine's.
pub(crate) fn resolve_target(args: &TargetArgs) -> Result<Resolved> {
    let manifest = load_release_manifest(args.manifest.as_deref())?;
    let os = args.os.as_deref().unwrap_or(std::env::consts::OS);
    let arch = args.arch.as_deref().unwrap_or(std::env::consts::ARCH);
    debug!("resolving release {} for {os}/{arch}", manifest.version());
    Resolved::from_names(&manifest, os, arch)
}

/// Combine CLI arguments, the config file, and platform defaults.
pub(crate) fn plan_install(
    args: &InstallArgs,
    quiet: bool,
    dirs: &dyn BaseDirs,
) -> Result<InstallPlan> {
    let config = InstallerConfig::load(args.config.as_deref(), dirs)?;
    let resolved = resolve_target(&args.target)?;
    let bin_dir = match args.bin_dir_override(&config) {
        Some(dir) => dir,
        None => default_bin_dir(dirs)?,
    };
    let self_test_timeout =
        (!args.skips_self_test(&config)).then(|| config.self_test_timeout());

    Ok(InstallPlan {
        resolved,
        bin_dir,
        download_timeout: args.download_timeout(&config),
        self_test_timeout,
        quiet,
    })
}

/// Print what `plan` would do without touching the network or disk.
pub(crate) fn write_dry_run(plan: &InstallPlan, stderr: &mut dyn Write) {
    let executable_path = plan.executable_path();
    let info = DryRunInfo {
        target: plan.resolved.target(),
        version: plan.resolved.version(),
        executable_path: &executable_path,
        self_test: plan.self_test_timeout.is_some(),
    };
    write_stderr_line(stderr, info.display_text());
}

/// Run the pipeline for `plan`.
pub(crate) fn execute_plan(
    plan: InstallPlan,
    services: &InstallServices<'_>,
    stderr: &mut dyn Write,
) -> Result<Verified> {
    let InstallPlan {
        resolved,
        bin_dir,
        self_test_timeout,
        quiet,
        ..
    } = plan;

    if !quiet {
        write_stderr_line(
            stderr,
            format!(
                "Downloading volley {} for {}...",
                resolved.version(),
                resolved.target().platform()
            ),
        );
    }
    let fetched = resolved.fetch_and_verify(services.downloader)?;
    info!(
        "verified {} ({} bytes)",
        fetched.artefact().target().artefact_filename(),
        fetched.artefact().bytes().len()
    );

    if !quiet {
        write_stderr_line(stderr, format!("Installing to {bin_dir}..."));
    }
    let installed = fetched.install(services.extractor, &bin_dir, EXECUTABLE_NAME)?;

    let verified = match self_test_timeout {
        Some(timeout) => {
            if !quiet {
                write_stderr_line(stderr, "Running self-test...");
            }
            installed.self_test(services.executor, timeout)?
        }
        None => {
            debug!("self-test skipped");
            installed.skip_self_test()
        }
    };

    if !quiet {
        write_stderr_line(stderr, "");
        write_stderr_line(
            stderr,
            success_message(verified.version(), &verified.binary().executable_path()),
        );
        if let Some(reported) = verified.reported_version() {
            write_stderr_line(stderr, format!("Self-test passed: {reported}"));
        }
    }

    Ok(verified)
}
