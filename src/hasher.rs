//! Deterministic content hashing over directory trees.
//!
//! Feeds one running SHA-1 with the relative path and byte content of every
//! admitted file under every root, in the canonical order produced by
//! [`crate::walk`]. Two trees with identical (relative path, content) pairs
//! hash identically regardless of host OS or physical directory-entry
//! order; archives are addressed and validated by this digest.

use crate::digest::ContentDigest;
use crate::error::{PackerError, Result};
use crate::filter::PathFilter;
use crate::manifest::is_manifest_name;
use crate::walk::walk_root;
use camino::{Utf8Path, Utf8PathBuf};
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::Read;

/// Fixed chunk size for streaming file bytes into the hash.
const HASH_CHUNK_SIZE: usize = 16 * 1024;

/// Hash the contents of `roots`, resolved against `base`.
///
/// Roots are visited in lexicographic order of their given paths, so the
/// order the caller supplies them in never affects the digest. A root that
/// is itself a file contributes only its path string; a directory root
/// contributes each admitted file's root-relative `/`-separated path
/// followed by its bytes in 16 KiB chunks. Files matching the manifest
/// name pattern (`*-manifest.txt`) never contribute.
///
/// # Errors
///
/// Returns [`PackerError::RootNotFound`] if a root does not exist, or
/// [`PackerError::HashRead`] if a file cannot be opened or read, naming
/// the offending path.
pub fn hash_contents(
    base: &Utf8Path,
    roots: &[Utf8PathBuf],
    filter: &PathFilter,
) -> Result<ContentDigest> {
    let mut sorted_roots: Vec<&Utf8PathBuf> = roots.iter().collect();
    sorted_roots.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    let mut hasher = Sha1::new();
    for root in sorted_roots {
        let resolved = base.join(root);
        if !resolved.as_std_path().exists() {
            return Err(PackerError::RootNotFound { path: root.clone() });
        }
        if resolved.as_std_path().is_file() {
            log::trace!("hashing top-level file {root}");
            hasher.update(root.as_str().as_bytes());
            continue;
        }
        for entry in walk_root(&resolved, filter)? {
            if !entry.is_file || is_manifest_name(file_name_of(&entry.rel_path)) {
                continue;
            }
            log::trace!("hashing {}", entry.rel_path);
            hasher.update(entry.rel_path.as_bytes());
            stream_file(&entry.abs_path, &mut hasher)?;
        }
    }
    Ok(ContentDigest::from_sha1(hasher))
}

/// Feed a file's bytes into the hash in fixed-size chunks.
fn stream_file(path: &Utf8Path, hasher: &mut Sha1) -> Result<()> {
    let mut file = File::open(path).map_err(|source| PackerError::HashRead {
        path: path.to_owned(),
        source,
    })?;
    let mut buffer = [0u8; HASH_CHUNK_SIZE];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|source| PackerError::HashRead {
                path: path.to_owned(),
                source,
            })?;
        if read == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..read]);
    }
}

fn file_name_of(rel_path: &str) -> &str {
    rel_path.rsplit('/').next().unwrap_or(rel_path)
}

#[cfg(test)]
#[path = "hasher_tests.rs"]
mod tests;
