//! Canonical directory traversal shared by hashing and archiving.
//!
//! Walks a root in an OS-independent order: at every directory the active
//! [`PathFilter`] is applied to the listing, then the surviving file names
//! are emitted in lexicographic order before the surviving subdirectories
//! are visited, themselves in lexicographic order. Relative paths use `/`
//! separators regardless of host OS, so the entry stream (and therefore the
//! content hash) is identical across platforms and physical directory-entry
//! orders.

use crate::error::{PackerError, Result};
use crate::filter::PathFilter;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// One entry produced by the canonical walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Path relative to the walked root, always `/`-separated.
    pub rel_path: String,
    /// Absolute (or root-joined) path usable for opening the entry.
    pub abs_path: Utf8PathBuf,
    /// Whether the entry is a file (directories are emitted for archive
    /// structure but never hashed).
    pub is_file: bool,
}

/// Walk `root` and return its entries in canonical order.
///
/// The root itself is not emitted. The filter is consulted on the listed
/// name before anything is stat'ed, so a filtered-out entry can never fail
/// the walk, whatever it points at. Admitted symlinks are classified by
/// their target, matching what a subsequent `File::open` will see; a
/// dangling one is emitted as a file and fails later at open time.
///
/// # Errors
///
/// Returns [`PackerError::NonUtf8Path`] for directory entries whose names
/// are not valid UTF-8, or [`PackerError::ListDir`] if a listing fails,
/// naming the directory.
pub fn walk_root(root: &Utf8Path, filter: &PathFilter) -> Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    walk_dir(root, "", filter, &mut entries)?;
    Ok(entries)
}

fn walk_dir(
    dir: &Utf8Path,
    rel_prefix: &str,
    filter: &PathFilter,
    entries: &mut Vec<DirectoryEntry>,
) -> Result<()> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    let listings = fs::read_dir(dir).map_err(|source| PackerError::ListDir {
        path: dir.to_owned(),
        source,
    })?;
    for listing in listings {
        let listing = listing.map_err(|source| PackerError::ListDir {
            path: dir.to_owned(),
            source,
        })?;
        let name = listing
            .file_name()
            .into_string()
            .map_err(|bad| PackerError::NonUtf8Path {
                path: dir.join(bad.to_string_lossy().as_ref()).to_string(),
            })?;
        if !filter.admits_file(&name) && !filter.admits_dir(&name) {
            continue;
        }
        // Follow symlinks so classification matches what open() will read.
        // A dangling symlink has no target to stat; the link itself is not
        // a directory, so it lands in the file branch and the open failure
        // surfaces later with its path.
        let is_dir = match fs::metadata(listing.path()) {
            Ok(meta) => meta.is_dir(),
            Err(_) => fs::symlink_metadata(listing.path())
                .map_err(|source| PackerError::ListDir {
                    path: dir.join(&name),
                    source,
                })?
                .is_dir(),
        };
        if is_dir {
            if filter.admits_dir(&name) {
                subdirs.push(name);
            }
        } else if filter.admits_file(&name) {
            files.push(name);
        }
    }

    files.sort();
    subdirs.sort();

    for name in files {
        entries.push(DirectoryEntry {
            rel_path: join_rel(rel_prefix, &name),
            abs_path: dir.join(&name),
            is_file: true,
        });
    }
    for name in subdirs {
        let rel = join_rel(rel_prefix, &name);
        let abs = dir.join(&name);
        entries.push(DirectoryEntry {
            rel_path: rel.clone(),
            abs_path: abs.clone(),
            is_file: false,
        });
        walk_dir(&abs, &rel, filter, entries)?;
    }
    Ok(())
}

fn join_rel(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}
