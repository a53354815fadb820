//! Tests for installer CLI parsing and default behaviours.

use super::*;
use rstest::rstest;

#[test]
fn cli_parses_defaults() {
    let cli = Cli::parse_from(["volley-installer"]);
    assert!(cli.command.is_none());
    assert_eq!(cli.install.target, TargetArgs::default());
    assert!(cli.install.bin_dir.is_none());
    assert!(!cli.install.skip_self_test);
    assert!(!cli.install.dry_run);
    assert!(cli.install.timeout.is_none());
    assert!(cli.install.config.is_none());
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);
}

#[test]
fn cli_parses_bin_dir_and_manifest() {
    let cli = Cli::parse_from([
        "volley-installer",
        "-b",
        "/opt/volley/bin",
        "--manifest",
        "volley.toml",
    ]);
    assert_eq!(cli.install.bin_dir, Some(Utf8PathBuf::from("/opt/volley/bin")));
    assert_eq!(
        cli.install.target.manifest,
        Some(Utf8PathBuf::from("volley.toml"))
    );
}

#[test]
fn cli_parses_platform_override() {
    let cli = Cli::parse_from(["volley-installer", "--os", "darwin", "--arch", "arm64"]);
    assert_eq!(cli.install.target.os.as_deref(), Some("darwin"));
    assert_eq!(cli.install.target.arch.as_deref(), Some("arm64"));
}

#[test]
fn cli_parses_install_subcommand() {
    let cli = Cli::parse_from(["volley-installer", "install", "--timeout", "30"]);
    match cli.command {
        Some(Command::Install(args)) => assert_eq!(args.timeout, Some(30)),
        _ => panic!("expected Install command"),
    }
}

#[test]
fn cli_parses_resolve_subcommand() {
    let cli = Cli::parse_from(["volley-installer", "resolve", "--os", "linux", "--arch", "amd64"]);
    match cli.command {
        Some(Command::Resolve(args)) => {
            assert_eq!(args.target.os.as_deref(), Some("linux"));
            assert_eq!(args.target.arch.as_deref(), Some("amd64"));
        }
        _ => panic!("expected Resolve command"),
    }
}

#[test]
fn cli_parses_show_with_json() {
    let cli = Cli::parse_from(["volley-installer", "show", "--json"]);
    match cli.command {
        Some(Command::Show(args)) => {
            assert!(args.json);
            assert!(args.manifest.is_none());
        }
        _ => panic!("expected Show command"),
    }
}

/// Parameterised tests for boolean CLI flags.
#[rstest]
#[case::skip_self_test(&["volley-installer", "--skip-self-test"], |cli: &Cli| cli.install.skip_self_test)]
#[case::dry_run(&["volley-installer", "--dry-run"], |cli: &Cli| cli.install.dry_run)]
#[case::verbose(&["volley-installer", "-v"], |cli: &Cli| cli.verbosity > 0)]
#[case::quiet(&["volley-installer", "-q"], |cli: &Cli| cli.quiet)]
fn cli_parses_boolean_flags(#[case] args: &[&str], #[case] check: fn(&Cli) -> bool) {
    let cli = Cli::parse_from(args);
    assert!(check(&cli));
}

#[rstest]
#[case::double_short(&["volley-installer", "-vv"], 2)]
#[case::double_long(&["volley-installer", "--verbose", "--verbose"], 2)]
fn cli_parses_repeatable_verbosity_flags(#[case] args: &[&str], #[case] expected: u8) {
    let cli = Cli::parse_from(args);
    assert_eq!(cli.verbosity, expected);
}

#[rstest]
#[case::install(&["volley-installer", "install", "-vv", "--dry-run"], 2, false)]
#[case::resolve(&["volley-installer", "resolve", "--os", "linux", "-v"], 1, false)]
#[case::show(&["volley-installer", "show", "--json", "--quiet"], 0, true)]
#[case::before_subcommand(&["volley-installer", "-v", "show"], 1, false)]
fn cli_accepts_logging_flags_around_subcommands(
    #[case] args: &[&str],
    #[case] verbosity: u8,
    #[case] quiet: bool,
) {
    let cli = Cli::try_parse_from(args).expect("logging flags are global");
    assert!(cli.command.is_some());
    assert_eq!(cli.verbosity, verbosity);
    assert_eq!(cli.quiet, quiet);
}

#[rstest]
#[case::verbose_with_quiet(&["volley-installer", "--verbose", "--quiet"])]
#[case::verbose_with_quiet_in_subcommand(&["volley-installer", "resolve", "-v", "-q"])]
#[case::zero_timeout(&["volley-installer", "--timeout", "0"])]
#[case::non_numeric_timeout(&["volley-installer", "--timeout", "soon"])]
fn cli_rejects_invalid_arguments(#[case] args: &[&str]) {
    Cli::try_parse_from(args).expect_err("expected clap to reject arguments");
}

#[test]
fn flags_override_config_values() {
    let config = InstallerConfig {
        bin_dir: Some(Utf8PathBuf::from("/from/config")),
        download_timeout_secs: 90,
        ..InstallerConfig::default()
    };
    let args = InstallArgs {
        bin_dir: Some(Utf8PathBuf::from("/from/flag")),
        timeout: Some(15),
        ..InstallArgs::default()
    };
    assert_eq!(args.bin_dir_override(&config), Some(Utf8PathBuf::from("/from/flag")));
    assert_eq!(args.download_timeout(&config), Duration::from_secs(15));
}

#[test]
fn config_values_apply_without_flags() {
    let config = InstallerConfig {
        bin_dir: Some(Utf8PathBuf::from("/from/config")),
        download_timeout_secs: 90,
        skip_self_test: true,
        ..InstallerConfig::default()
    };
    let args = InstallArgs::default();
    assert_eq!(args.bin_dir_override(&config), Some(Utf8PathBuf::from("/from/config")));
    assert_eq!(args.download_timeout(&config), Duration::from_secs(90));
    assert!(args.skips_self_test(&config));
}

#[test]
fn install_args_returns_flattened_when_no_subcommand() {
    let cli = Cli::parse_from(["volley-installer", "--skip-self-test"]);
    assert!(cli.install_args().skip_self_test);
}

#[test]
fn install_args_returns_subcommand_args_when_present() {
    let cli = Cli::parse_from(["volley-installer", "install", "--dry-run"]);
    assert!(cli.install_args().dry_run);
}
