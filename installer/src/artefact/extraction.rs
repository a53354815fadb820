//! Executable extraction from release archives.
//!
//! Release artefacts are `.tar.gz` archives holding a single `volley`
//! executable. Extraction happens in memory: the executable's bytes are
//! returned to the caller, and nothing touches the install directory until
//! the archive has been fully validated.

use std::io::Read;
use std::path::{Component, Path};

/// Trait for extracting the executable from an artefact archive, enabling
/// test mocking.
///
/// # Examples
///
/// ```
/// use volley_installer::artefact::extraction::TarGzExtractor;
///
/// let extractor = TarGzExtractor;
/// // Use extractor.extract_executable(archive_bytes, "volley") in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactExtractor {
    /// Return the contents of the archive entry named `executable_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry attempts to
    /// escape the archive root.
    /// Returns [`ExtractionError::MissingExecutable`] if no regular file
    /// with that name exists.
    /// Returns [`ExtractionError::Io`] on decompression or read failures.
    fn extract_executable(
        &self,
        archive: &[u8],
        executable_name: &str,
    ) -> Result<Vec<u8>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path in the archive attempts to traverse outside the archive root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive holds no regular file with the executable's name.
    #[error("archive does not contain an executable named {name}")]
    MissingExecutable {
        /// The expected executable name.
        name: String,
    },
}

/// Default extractor using the `tar` and `flate2` crates.
///
/// Validates every entry path to guard against path traversal, even
/// though only one entry is read.
pub struct TarGzExtractor;

impl ArtefactExtractor for TarGzExtractor {
    fn extract_executable(
        &self,
        archive: &[u8],
        executable_name: &str,
    ) -> Result<Vec<u8>, ExtractionError> {
        let decoder = flate2::read::GzDecoder::new(archive);
        let mut tar = tar::Archive::new(decoder);
        let mut found = None;

        for entry_result in tar.entries()? {
            let mut entry = entry_result?;
            let entry_path = entry.path()?.into_owned();
            validate_entry_path(&entry_path)?;

            if found.is_some() || !entry.header().entry_type().is_file() {
                continue;
            }
            if entry_path.file_name().is_some_and(|name| name == executable_name) {
                let mut contents = Vec::new();
                entry.read_to_end(&mut contents)?;
                found = Some(contents);
            }
        }

        found.ok_or_else(|| ExtractionError::MissingExecutable {
            name: executable_name.to_owned(),
        })
    }
}

/// Validate that a tar entry path does not escape the archive root via
/// `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Component::ParentDir) {
            return Err(ExtractionError::PathTraversal {
                path: path.display().to_string(),
            });
        }
    }
    Ok(())
}
