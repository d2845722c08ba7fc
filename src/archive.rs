//! Archive assembly for zip and tar.gz artifacts.
//!
//! Writes the manifest entry first, then each input root's tree in the
//! canonical walk order, with the same [`PathFilter`] that drove hashing.
//! Both containers apply the filter, so the recorded hash always describes
//! the packaged contents whichever format was chosen.
//!
//! Entry paths are rewritten to sit under the configured top-level
//! directory (or at the archive root when the policy is
//! [`TopDirPolicy::None`]); `.` components from the root arguments are
//! dropped so `--chdir`-style invocations produce clean entries.

use crate::config::{ArchiveFormat, BuildConfig, TopDirPolicy};
use crate::error::{PackerError, Result};
use crate::filter::PathFilter;
use crate::manifest::is_manifest_name;
use crate::naming::ArtifactName;
use crate::walk::{walk_root, DirectoryEntry};
use camino::{Utf8Path, Utf8PathBuf};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Assemble the archive and return the path written.
///
/// `manifest_path` points at the rendered temporary manifest; it is
/// embedded as `<top>/<name>-manifest.txt`. The output directory must
/// already exist.
///
/// # Errors
///
/// Returns [`PackerError::RootNotFound`] for a missing input root,
/// [`PackerError::Io`] if the output file cannot be written, or
/// [`PackerError::Zip`] on zip encoding failures.
pub fn build_archive(
    config: &BuildConfig,
    artifact_name: &ArtifactName,
    manifest_path: &Path,
    filter: &PathFilter,
) -> Result<Utf8PathBuf> {
    let out_path = config
        .output_dir
        .join(artifact_name.file_name(config.format.extension()));
    let top = top_dir_name(config, artifact_name);

    match config.format {
        ArchiveFormat::Zip => write_zip(config, &out_path, top.as_deref(), manifest_path, filter),
        ArchiveFormat::TarGz => {
            write_tar_gz(config, &out_path, top.as_deref(), manifest_path, filter)
        }
    }?;
    Ok(out_path)
}

/// Resolve the top-level directory name for the active policy.
fn top_dir_name(config: &BuildConfig, artifact_name: &ArtifactName) -> Option<String> {
    match &config.top_dir {
        TopDirPolicy::ArtifactName => Some(artifact_name.full_name()),
        TopDirPolicy::Literal(name) => Some(name.clone()),
        TopDirPolicy::None => None,
    }
}

/// Join entry path parts under the top directory, dropping `.` components.
fn entry_name(top: Option<&str>, root: &Utf8Path, rel: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(top) = top {
        parts.push(top);
    }
    parts.extend(root.as_str().split('/').filter(|c| !matches!(*c, "" | ".")));
    parts.extend(rel.split('/').filter(|c| !c.is_empty()));
    parts.join("/")
}

/// Resolve one root against the base directory, checking existence.
fn resolve_root(config: &BuildConfig, root: &Utf8Path) -> Result<Utf8PathBuf> {
    let resolved = config.base_dir.join(root);
    if resolved.as_std_path().exists() {
        Ok(resolved)
    } else {
        Err(PackerError::RootNotFound {
            path: root.to_owned(),
        })
    }
}

fn packaged_file(entry: &DirectoryEntry) -> bool {
    let name = entry.rel_path.rsplit('/').next().unwrap_or(&entry.rel_path);
    entry.is_file && !is_manifest_name(name)
}

fn write_zip(
    config: &BuildConfig,
    out_path: &Utf8Path,
    top: Option<&str>,
    manifest_path: &Path,
    filter: &PathFilter,
) -> Result<()> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(File::create(out_path)?);

    let manifest_entry = entry_name(top, Utf8Path::new("."), &config.manifest_file_name());
    writer.start_file(manifest_entry, options)?;
    io::copy(&mut File::open(manifest_path)?, &mut writer)?;

    for root in &config.roots {
        let resolved = resolve_root(config, root)?;
        if resolved.as_std_path().is_file() {
            writer.start_file(entry_name(top, root, ""), options)?;
            io::copy(&mut File::open(&resolved)?, &mut writer)?;
            continue;
        }
        let root_entry = entry_name(top, root, "");
        if !root_entry.is_empty() {
            writer.add_directory(root_entry, options)?;
        }
        for entry in walk_root(&resolved, filter)? {
            let name = entry_name(top, root, &entry.rel_path);
            if packaged_file(&entry) {
                writer.start_file(name, options)?;
                io::copy(&mut File::open(&entry.abs_path)?, &mut writer)?;
            } else if !entry.is_file {
                writer.add_directory(name, options)?;
            }
        }
    }

    writer.finish()?;
    Ok(())
}

fn write_tar_gz(
    config: &BuildConfig,
    out_path: &Utf8Path,
    top: Option<&str>,
    manifest_path: &Path,
    filter: &PathFilter,
) -> Result<()> {
    let encoder = GzEncoder::new(File::create(out_path)?, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let manifest_entry = entry_name(top, Utf8Path::new("."), &config.manifest_file_name());
    builder.append_path_with_name(manifest_path, manifest_entry)?;

    for root in &config.roots {
        let resolved = resolve_root(config, root)?;
        if resolved.as_std_path().is_file() {
            builder.append_path_with_name(&resolved, entry_name(top, root, ""))?;
            continue;
        }
        let root_entry = entry_name(top, root, "");
        if !root_entry.is_empty() {
            builder.append_dir(&root_entry, &resolved)?;
        }
        for entry in walk_root(&resolved, filter)? {
            let name = entry_name(top, root, &entry.rel_path);
            if packaged_file(&entry) {
                builder.append_path_with_name(&entry.abs_path, name)?;
            } else if !entry.is_file {
                builder.append_dir(&name, &entry.abs_path)?;
            }
        }
    }

    // into_inner writes the tar terminator; the encoder then flushes the
    // gzip trailer so the stream is complete.
    builder.into_inner()?.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_names_nest_under_the_top_directory() {
        assert_eq!(
            entry_name(Some("foo-1.0"), Utf8Path::new("src"), "sub/file.txt"),
            "foo-1.0/src/sub/file.txt"
        );
    }

    #[test]
    fn entry_names_drop_dot_components() {
        assert_eq!(
            entry_name(Some("foo-1.0"), Utf8Path::new("."), "file1.txt"),
            "foo-1.0/file1.txt"
        );
        assert_eq!(
            entry_name(None, Utf8Path::new("."), "file1.txt"),
            "file1.txt"
        );
    }

    #[test]
    fn entry_names_without_a_top_directory_start_at_the_root() {
        assert_eq!(
            entry_name(None, Utf8Path::new("src"), "file1.txt"),
            "src/file1.txt"
        );
    }

    #[test]
    fn root_only_entries_name_the_root() {
        assert_eq!(entry_name(Some("top"), Utf8Path::new("src"), ""), "top/src");
        assert_eq!(entry_name(None, Utf8Path::new("."), ""), "");
    }
}
