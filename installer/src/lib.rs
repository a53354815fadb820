//! Volley installer library.
//!
//! This crate resolves the Volley CLI release archive for a platform,
//! verifies it against the SHA-256 digest recorded in a release manifest,
//! installs the `volley` executable, and runs its `--version` self-test.
//! It is used by the `volley-installer` CLI binary and can be consumed
//! programmatically for testing or custom installation workflows.
//!
//! # Modules
//!
//! - [`artefact`] - Release manifests, downloads, verification, and unpacking
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Optional `config.toml` defaults
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Semantic error types for every failure mode
//! - [`output`] - Progress, dry-run, and listing output
//! - [`pipeline`] - Typestate install pipeline
//! - [`self_test`] - Post-install `--version` check
//! - [`stager`] - Writing the executable into the install directory

pub mod artefact;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod stager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
