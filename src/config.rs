//! Immutable build configuration record.
//!
//! A [`BuildConfig`] is assembled once from CLI input plus resolved metadata
//! defaults and never mutated afterwards. `--chdir` never changes the
//! process working directory; it is expressed as explicit path composition
//! instead: every input root is resolved against [`BuildConfig::base_dir`],
//! and the output directory is resolved against the invocation directory
//! before the record is built.

use camino::Utf8PathBuf;
use std::collections::BTreeSet;

/// Container format for the produced artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Deflate-compressed zip archive.
    Zip,
    /// Gzip-compressed tar archive.
    TarGz,
}

impl ArchiveFormat {
    /// File extension for the archive, without the leading dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tgz",
        }
    }
}

/// Naming policy for the top-level directory inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopDirPolicy {
    /// Nest contents under the composed artifact name (the default).
    ArtifactName,
    /// Nest contents under an explicitly supplied directory name.
    Literal(String),
    /// Place manifest and contents at the archive root.
    None,
}

impl TopDirPolicy {
    /// Interpret the CLI `--top-dir-name` value.
    ///
    /// A literal `.` selects no enclosing directory; absence selects the
    /// artifact-name default.
    #[must_use]
    pub fn from_cli(value: Option<&str>) -> Self {
        match value {
            None => Self::ArtifactName,
            Some(".") => Self::None,
            Some(name) => Self::Literal(name.to_owned()),
        }
    }
}

/// Immutable configuration for one packer invocation.
///
/// Provenance fields (`author`, `build_id`, ...) are already resolved:
/// metadata lookups and defaulting happen before construction, so the core
/// components treat every field as a plain value.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Human-readable artifact name, e.g. `mocha-bcc-mac`.
    pub name: String,
    /// Base version recorded in the manifest and the artifact name.
    pub base_version: String,
    /// Word size of the packaged build (32 or 64).
    pub bits: u32,
    /// Person (username/email) building the archive.
    pub author: String,
    /// Build identifier; empty when unresolved, which omits it from the
    /// artifact name.
    pub build_id: String,
    /// Source-control branch the build came from.
    pub build_branch: String,
    /// Timestamp of the build.
    pub build_date: String,
    /// Host that produced the build.
    pub build_machine: String,
    /// Target OS name.
    pub os: String,
    /// Description of the OS the build ran on.
    pub build_os: String,
    /// Free-form manifest note.
    pub note: String,
    /// Input roots, as given on the command line, resolved against
    /// [`Self::base_dir`].
    pub roots: Vec<Utf8PathBuf>,
    /// File and directory names excluded from hashing and archiving.
    pub excluded: BTreeSet<String>,
    /// Whether dot-prefixed names are included.
    pub include_hidden: bool,
    /// Whether subdirectories are descended into.
    pub recurse: bool,
    /// Top-level directory naming policy.
    pub top_dir: TopDirPolicy,
    /// Output container format.
    pub format: ArchiveFormat,
    /// Directory the archive is written into (resolved, caller-created).
    pub output_dir: Utf8PathBuf,
    /// Base directory input roots are resolved against (the `--chdir`
    /// replacement).
    pub base_dir: Utf8PathBuf,
    /// Suppress manifest echo and progress output.
    pub silent: bool,
}

impl BuildConfig {
    /// Name of the manifest file embedded in the archive, e.g.
    /// `foo-manifest.txt`.
    #[must_use]
    pub fn manifest_file_name(&self) -> String {
        format!("{}-manifest.txt", self.name)
    }
}
