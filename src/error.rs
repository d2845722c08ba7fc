//! Error types for the artifact packer.
//!
//! This module defines semantic error variants covering the failure modes of
//! hashing, archive assembly, and validation. Fatal errors map to exit status
//! 1 in the CLI; degraded metadata lookups never surface here (they warn and
//! fall back to defaults instead).

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while building or validating an artifact.
#[derive(Debug, Error)]
pub enum PackerError {
    /// A declared input root does not exist on disk.
    #[error("input root {path} does not exist")]
    RootNotFound {
        /// The missing root, as given in the configuration.
        path: Utf8PathBuf,
    },

    /// A file could not be read during the hashing walk.
    #[error("can't open {path} for hashing")]
    HashRead {
        /// The file that failed to open or read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be listed during the walk.
    #[error("can't list directory {path}")]
    ListDir {
        /// The directory whose listing failed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A directory listing produced a name that is not valid UTF-8.
    ///
    /// Entry paths are fed into the content hash as UTF-8 strings, so a
    /// non-UTF-8 name has no stable representation and is rejected.
    #[error("directory entry {path} is not valid UTF-8")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// No `*-manifest.txt` file was found during validation.
    #[error("no manifest found in {dir}; can't validate")]
    ManifestNotFound {
        /// The directory that was searched.
        dir: Utf8PathBuf,
    },

    /// The manifest was found but carries no `content-hash:` line.
    #[error("can't find hash line in manifest {path}")]
    ManifestHashMissing {
        /// Path to the manifest that was read.
        path: Utf8PathBuf,
    },

    /// A manifest value cannot be rendered in the line-oriented format.
    #[error("manifest value for {key} must be a single line")]
    ManifestValue {
        /// The manifest key whose value was rejected.
        key: &'static str,
    },

    /// A digest string failed validation.
    #[error("invalid content digest: {reason}")]
    InvalidDigest {
        /// Description of the validation failure.
        reason: String,
    },

    /// Zip archive assembly failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`PackerError`].
pub type Result<T> = std::result::Result<T, PackerError>;
