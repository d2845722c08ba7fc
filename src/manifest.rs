//! Provenance manifest rendering and lookup.
//!
//! The manifest is a newline-terminated `key: value` text file embedded in
//! every artifact. Key order is fixed and significant: the provenance keys
//! first, then the two computed trailer lines (`fullname`, `content-hash`).
//! This layout is the durable contract consumed by the validator and by
//! downstream automation, so values are restricted to single lines rather
//! than introducing an escaping scheme.
//!
//! The rendered manifest is a transient artifact: written to a scoped
//! temporary file, embedded into the archive, then removed when the
//! temporary file is dropped, on success and failure alike.

use crate::config::BuildConfig;
use crate::digest::ContentDigest;
use crate::error::{PackerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use std::io::{Read, Write};
use tempfile::NamedTempFile;

/// Suffix identifying manifest files, used both for naming and for the
/// hash-time ignore rule.
pub const MANIFEST_SUFFIX: &str = "-manifest.txt";

/// Manifest key for the recorded content hash.
const CONTENT_HASH_KEY: &str = "content-hash";

/// Upper bound on how much of a manifest is read during validation.
/// Real manifests are a few hundred bytes; the cap bounds I/O on a
/// malformed or mislabelled huge file.
const MANIFEST_READ_LIMIT: u64 = 1024 * 1024;

/// Whether `name` matches the manifest file pattern (`*-manifest.txt`).
#[must_use]
pub fn is_manifest_name(name: &str) -> bool {
    name.ends_with(MANIFEST_SUFFIX)
}

/// An ordered provenance record ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    entries: Vec<(&'static str, String)>,
}

impl ManifestRecord {
    /// Build the record from the configuration plus the computed fields.
    ///
    /// # Errors
    ///
    /// Returns [`PackerError::ManifestValue`] if any value contains a
    /// newline, which would corrupt the line-oriented format.
    pub fn new(config: &BuildConfig, full_name: &str, digest: &ContentDigest) -> Result<Self> {
        let entries = vec![
            ("base-version", config.base_version.clone()),
            ("name", config.name.clone()),
            ("os", config.os.clone()),
            ("bits", config.bits.to_string()),
            ("author", config.author.clone()),
            ("build-id", config.build_id.clone()),
            ("build-branch", config.build_branch.clone()),
            ("build-date", config.build_date.clone()),
            ("build-machine", config.build_machine.clone()),
            ("build-os", config.build_os.clone()),
            ("note", config.note.clone()),
            ("fullname", full_name.to_owned()),
            (CONTENT_HASH_KEY, digest.as_str().to_owned()),
        ];
        for (key, value) in &entries {
            if value.contains('\n') || value.contains('\r') {
                return Err(PackerError::ManifestValue { key: *key });
            }
        }
        Ok(Self { entries })
    }

    /// Render the record as `key: value` lines in fixed order.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = String::new();
        for (key, value) in &self.entries {
            text.push_str(key);
            text.push_str(": ");
            text.push_str(value);
            text.push('\n');
        }
        text
    }

    /// Write the rendered record to a scoped temporary file.
    ///
    /// The returned handle deletes the file when dropped, which guarantees
    /// cleanup even when archive assembly fails partway.
    ///
    /// # Errors
    ///
    /// Returns [`PackerError::Io`] if the temporary file cannot be created
    /// or written.
    pub fn write_temp(&self, name: &str) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(&format!("{name}-manifest"))
            .tempfile()?;
        file.write_all(self.render().as_bytes())?;
        file.flush()?;
        Ok(file)
    }
}

/// Delete stray manifest files left in input roots by a prior run.
///
/// A leftover `<name>-manifest.txt` inside a source directory would be
/// packaged alongside the fresh manifest, so it is removed before archiving
/// and a warning is surfaced.
///
/// # Errors
///
/// Returns [`PackerError::Io`] if an existing stray manifest cannot be
/// removed.
pub fn remove_stray_manifests(config: &BuildConfig, stderr: &mut dyn Write) -> Result<()> {
    let manifest_name = config.manifest_file_name();
    for root in &config.roots {
        let stray = config.base_dir.join(root).join(&manifest_name);
        if stray.as_std_path().exists() {
            log::warn!("stray manifest {stray} deleted from source");
            let _ = writeln!(
                stderr,
                "WARNING: {manifest_name} already exists in source dir {root}; deleting from source!"
            );
            std::fs::remove_file(&stray)?;
        }
    }
    Ok(())
}

/// Locate the manifest file directly inside `dir`.
///
/// Matches names ending in `-manifest.txt`; when several are present the
/// lexicographically first is used (the ambiguous case is deliberately left
/// unspecified beyond that).
///
/// # Errors
///
/// Returns [`PackerError::ManifestNotFound`] when no match exists, or
/// [`PackerError::Io`] if the directory cannot be listed.
pub fn find_manifest(dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let mut matches = Vec::new();
    for entry in dir.as_std_path().read_dir()? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_manifest_name(&name) && entry.file_type()?.is_file() {
            matches.push(name);
        }
    }
    matches.sort();
    matches
        .into_iter()
        .next()
        .map(|name| dir.join(name))
        .ok_or_else(|| PackerError::ManifestNotFound {
            dir: dir.to_owned(),
        })
}

/// Read the recorded content hash from a manifest file.
///
/// Reads at most 1 MiB and scans for the `content-hash:` line.
///
/// # Errors
///
/// Returns [`PackerError::ManifestHashMissing`] when no hash line is
/// present, [`PackerError::InvalidDigest`] when the recorded value is not a
/// well-formed truncated digest, or [`PackerError::Io`] on read failure.
pub fn read_recorded_hash(path: &Utf8Path) -> Result<ContentDigest> {
    let mut text = String::new();
    File::open(path)?
        .take(MANIFEST_READ_LIMIT)
        .read_to_string(&mut text)?;

    let prefix = format!("{CONTENT_HASH_KEY}: ");
    text.lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .ok_or_else(|| PackerError::ManifestHashMissing {
            path: path.to_owned(),
        })
        .and_then(|value| ContentDigest::try_from(value.trim()))
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
