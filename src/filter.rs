//! Inclusion rules for directory traversal.
//!
//! A [`PathFilter`] decides which immediate children of a directory are
//! traversed or included. The same filter instance drives both the content
//! hasher and the archive builder; divergence between the two would let the
//! recorded hash drift away from the packaged contents.
//!
//! Rules are applied in a fixed order: the no-recurse policy suppresses all
//! subdirectories, explicitly excluded names are removed, the artifact's own
//! output file is removed (so an archive landing inside an input directory
//! never packages itself), and dot-prefixed names are removed unless hidden
//! inclusion was requested.

use std::collections::BTreeSet;

/// Pure predicate set over directory-listing names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFilter {
    recurse: bool,
    include_hidden: bool,
    excluded: BTreeSet<String>,
    output_file_name: Option<String>,
}

impl PathFilter {
    /// Create a filter from the active policies.
    #[must_use]
    pub fn new(recurse: bool, include_hidden: bool, excluded: BTreeSet<String>) -> Self {
        Self {
            recurse,
            include_hidden,
            excluded,
            output_file_name: None,
        }
    }

    /// A filter that admits everything.
    ///
    /// Used during validation, where the unpacked tree was already filtered
    /// at build time and every surviving file must contribute to the hash.
    #[must_use]
    pub fn permissive() -> Self {
        Self::new(true, true, BTreeSet::new())
    }

    /// Return a copy that additionally removes the artifact's own output
    /// file by its literal name (e.g. `foo-1.0-2026.08.28-0123456789abcdef.zip`).
    #[must_use]
    pub fn with_output_file_name(&self, name: String) -> Self {
        Self {
            output_file_name: Some(name),
            ..self.clone()
        }
    }

    /// Whether a subdirectory named `name` should be descended into.
    #[must_use]
    pub fn admits_dir(&self, name: &str) -> bool {
        self.recurse && self.admits_name(name)
    }

    /// Whether a file named `name` should be included.
    #[must_use]
    pub fn admits_file(&self, name: &str) -> bool {
        self.admits_name(name)
    }

    fn admits_name(&self, name: &str) -> bool {
        if self.excluded.contains(name) {
            return false;
        }
        if self.output_file_name.as_deref() == Some(name) {
            return false;
        }
        self.include_hidden || !name.starts_with('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn excluding(names: &[&str]) -> PathFilter {
        PathFilter::new(
            true,
            false,
            names.iter().map(|n| (*n).to_owned()).collect(),
        )
    }

    #[rstest]
    #[case::plain_file("file1.txt", true)]
    #[case::hidden_file(".hidden.txt", false)]
    #[case::excluded_file("file2.txt", false)]
    fn default_policy_files(#[case] name: &str, #[case] admitted: bool) {
        let filter = excluding(&["file2.txt"]);
        assert_eq!(filter.admits_file(name), admitted);
    }

    #[test]
    fn no_recurse_suppresses_all_subdirectories() {
        let filter = PathFilter::new(false, true, BTreeSet::new());
        assert!(!filter.admits_dir("sub"));
        assert!(filter.admits_file("file1.txt"));
    }

    #[test]
    fn hidden_directories_follow_the_hidden_policy() {
        let default_filter = excluding(&[]);
        assert!(!default_filter.admits_dir(".git"));

        let with_hidden = PathFilter::new(true, true, BTreeSet::new());
        assert!(with_hidden.admits_dir(".git"));
    }

    #[test]
    fn exclusion_applies_to_directories_too() {
        let filter = excluding(&["build"]);
        assert!(!filter.admits_dir("build"));
    }

    #[test]
    fn output_file_is_never_packaged() {
        let filter = excluding(&[]).with_output_file_name("foo-1.0.zip".to_owned());
        assert!(!filter.admits_file("foo-1.0.zip"));
        assert!(filter.admits_file("foo-1.1.zip"));
    }

    #[test]
    fn permissive_filter_admits_hidden_and_nested() {
        let filter = PathFilter::permissive();
        assert!(filter.admits_file(".hidden.txt"));
        assert!(filter.admits_dir("sub"));
    }
}
