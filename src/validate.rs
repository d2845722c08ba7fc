//! Validation of unpacked artifacts against their recorded hash.
//!
//! Re-hashes an unpacked archive directory with a permissive filter (the
//! tree was already filtered when the archive was built) and compares the
//! result against the `content-hash:` line of the embedded manifest. A
//! mismatch is the one designed-for failure path of the tool and maps to a
//! non-zero exit status in the CLI.

use crate::digest::ContentDigest;
use crate::error::Result;
use crate::filter::PathFilter;
use crate::hasher::hash_contents;
use crate::manifest::{find_manifest, read_recorded_hash};
use camino::Utf8Path;

/// Outcome of comparing an unpacked tree against its manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Digest recomputed from the directory contents.
    pub actual: ContentDigest,
    /// Digest recorded in the manifest at build time.
    pub expected: ContentDigest,
}

impl ValidationReport {
    /// Whether the recomputed digest matches the recorded one.
    #[must_use]
    pub fn matches(&self) -> bool {
        self.actual == self.expected
    }
}

/// Validate the unpacked archive rooted at `dir`.
///
/// Locates the `*-manifest.txt` directly inside `dir` (first in sorted
/// order when several exist), reads its recorded hash, and re-hashes the
/// directory excluding manifest files.
///
/// # Errors
///
/// Returns [`crate::error::PackerError::ManifestNotFound`] when no manifest
/// is present, or any hashing error from the re-walk. A hash mismatch is
/// not an error; inspect [`ValidationReport::matches`].
pub fn validate_unpacked(dir: &Utf8Path) -> Result<ValidationReport> {
    let manifest = find_manifest(dir)?;
    let expected = read_recorded_hash(&manifest)?;

    // The walk starts at the unpacked top directory itself, so relative
    // paths line up with a build whose contents sit directly under the
    // top-level directory.
    let actual = hash_contents(Utf8Path::new(""), &[dir.to_owned()], &PathFilter::permissive())?;

    Ok(ValidationReport { actual, expected })
}
