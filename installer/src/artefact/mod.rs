//! Release manifests, artefact retrieval, and verification policy.
//!
//! This module implements the type-safe domain model for prebuilt Volley
//! releases: which archive serves which platform, how it is fetched, and
//! how its integrity is checked before anything is installed.
//!
//! # Sub-modules
//!
//! - [`error`] - Semantic error types for validation failures.
//! - [`target`] - Platform identification (`Os`, `Arch`, `Platform`).
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`naming`] - Archive naming and release URL template (`ArtefactName`).
//! - [`manifest`] - Manifest types (`ReleaseManifest`, `PlatformTarget`).
//! - [`manifest_parser`] - Manifest TOML deserialization.
//! - [`download`] - Artefact download trait and HTTP implementation.
//! - [`verification`] - Checksum verification (`VerifiedArtefact`).
//! - [`extraction`] - Executable extraction with path traversal protection.

pub mod download;
pub mod error;
pub mod extraction;
pub mod manifest;
pub mod manifest_parser;
pub mod naming;
pub mod sha256_digest;
pub mod target;
pub mod verification;
