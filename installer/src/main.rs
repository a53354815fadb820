//! Volley installer CLI entrypoint.
//!
//! This binary resolves the Volley CLI release archive for the current
//! machine, verifies its checksum, installs the `volley` executable, and
//! runs a `--version` self-test.

mod install_flow;

use clap::Parser;
use install_flow::{
    InstallServices, execute_plan, load_release_manifest, plan_install, resolve_target,
    write_dry_run,
};
use std::io::Write;
use volley_installer::artefact::download::HttpDownloader;
use volley_installer::artefact::extraction::TarGzExtractor;
use volley_installer::cli::{Cli, Command, InstallArgs, ResolveArgs, ShowArgs};
use volley_installer::dirs::{BaseDirs, SystemBaseDirs};
use volley_installer::error::Result;
use volley_installer::output::{
    format_resolution, format_targets_human, format_targets_json, write_stderr_line,
};
use volley_installer::self_test::SystemCommandExecutor;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Route `-v` counts to the `log` facade; warnings are always shown.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Some(Command::Resolve(args)) => run_resolve(args, stdout),
        Some(Command::Show(args)) => run_show(args, stdout),
        Some(Command::Install(_)) | None => {
            run_install(cli.install_args(), cli.quiet, &SystemBaseDirs::new(), stderr)
        }
    }
}

/// Prints the URL and checksum for the selected platform.
fn run_resolve(args: &ResolveArgs, stdout: &mut dyn Write) -> Result<()> {
    let resolved = resolve_target(&args.target)?;
    writeln!(stdout, "{}", format_resolution(resolved.target()))?;
    Ok(())
}

/// Lists every target in the manifest.
fn run_show(args: &ShowArgs, stdout: &mut dyn Write) -> Result<()> {
    let manifest = load_release_manifest(args.manifest.as_deref())?;
    let output = if args.json {
        format_targets_json(&manifest)
    } else {
        format_targets_human(&manifest)
    };
    writeln!(stdout, "{}", output.trim_end())?;
    Ok(())
}

/// Installs, or describes the installation in dry-run mode.
fn run_install(
    args: &InstallArgs,
    quiet: bool,
    dirs: &dyn BaseDirs,
    stderr: &mut dyn Write,
) -> Result<()> {
    let plan = plan_install(args, quiet, dirs)?;

    if args.dry_run {
        write_dry_run(&plan, stderr);
        return Ok(());
    }

    let downloader = HttpDownloader::new(plan.download_timeout);
    let services = InstallServices {
        downloader: &downloader,
        extractor: &TarGzExtractor,
        executor: &SystemCommandExecutor,
    };
    execute_plan(plan, &services, stderr)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}
