//! Shared test utilities for the installer crate.

use crate::artefact::download::{ArtefactDownloader, DownloadError};
use crate::artefact::sha256_digest::Sha256Digest;
use crate::self_test::CommandExecutor;
use camino::Utf8Path;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};
use std::time::Duration;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with the given stdout.
pub fn output_with_stdout(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// One file to place in a test archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    path: String,
    contents: Vec<u8>,
    unchecked: bool,
}

impl ArchiveEntry {
    /// A regular file at `path`.
    pub fn file(path: &str, contents: &[u8]) -> Self {
        Self {
            path: path.to_owned(),
            contents: contents.to_vec(),
            unchecked: false,
        }
    }

    /// A regular file whose path is written verbatim into the header.
    ///
    /// `tar` refuses to build entries containing `..`; this bypasses that
    /// check so extraction guards can be exercised.
    pub fn unchecked(path: &str, contents: &[u8]) -> Self {
        Self {
            unchecked: true,
            ..Self::file(path, contents)
        }
    }
}

/// Builds an in-memory `.tar.gz` archive from `entries`.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn tar_gz_archive(entries: &[ArchiveEntry]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for entry in entries {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(entry.contents.len() as u64);
        header.set_mode(0o755);
        if entry.unchecked {
            let name = entry.path.as_bytes();
            header
                .as_old_mut()
                .name
                .get_mut(..name.len())
                .expect("archive path fits the header")
                .copy_from_slice(name);
        } else {
            header.set_path(&entry.path).expect("set archive path");
        }
        header.set_cksum();
        builder
            .append(&header, entry.contents.as_slice())
            .expect("append archive entry");
    }

    builder
        .into_inner()
        .and_then(GzEncoder::finish)
        .expect("finish archive")
}

/// Returns the lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256Digest::of(bytes).into_inner()
}

/// Renders a single-target manifest with an explicit URL.
pub fn manifest_toml(version: &str, os: &str, arch: &str, sha256: &str, url: &str) -> String {
    format!(
        concat!(
            "version = \"{}\"\n\n",
            "[[targets]]\n",
            "os = \"{}\"\n",
            "arch = \"{}\"\n",
            "sha256 = \"{}\"\n",
            "url = \"{}\"\n",
        ),
        version, os, arch, sha256, url
    )
}

/// A stub `ArtefactDownloader` serving one canned response.
///
/// Records every requested URL for later assertions.
#[derive(Debug)]
pub struct StubDownloader {
    response: RefCell<Option<Result<Vec<u8>, DownloadError>>>,
    requested: RefCell<Vec<String>>,
}

impl StubDownloader {
    /// Serves `bytes` for the first request.
    pub fn serving(bytes: Vec<u8>) -> Self {
        Self::with_response(Ok(bytes))
    }

    /// Fails the first request with `error`.
    pub fn failing(error: DownloadError) -> Self {
        Self::with_response(Err(error))
    }

    fn with_response(response: Result<Vec<u8>, DownloadError>) -> Self {
        Self {
            response: RefCell::new(Some(response)),
            requested: RefCell::new(Vec::new()),
        }
    }

    /// Returns the URLs requested so far.
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl ArtefactDownloader for StubDownloader {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.requested.borrow_mut().push(url.to_owned());
        self.response
            .borrow_mut()
            .take()
            .expect("unexpected second download")
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The program path expected to be run.
    pub program: String,
    /// The arguments to pass to the command.
    pub args: Vec<&'static str>,
    /// The result to return; `Ok(None)` simulates a timeout.
    pub result: std::io::Result<Option<Output>>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(
        &self,
        program: &Utf8Path,
        args: &[&str],
        _timeout: Duration,
    ) -> std::io::Result<Option<Output>> {
        let mut expected = self.expected.borrow_mut();
        let call = expected.pop_front().expect("unexpected command invocation");

        assert_eq!(call.program, program.as_str());
        assert_eq!(call.args.as_slice(), args);

        call.result
    }
}
