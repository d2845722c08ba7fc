//! Artifact naming policy.
//!
//! Composes the final artifact base name from the configured name, base
//! version, optional build id, build date, and the truncated content
//! digest: `name-baseVersion[-buildId]-YYYY.MM.DD-digest`. The file
//! extension is appended only by the archive builder. Given the same
//! configuration, directory contents, and date, the composed name is
//! byte-for-byte identical.

use crate::config::BuildConfig;
use crate::digest::ContentDigest;
use chrono::NaiveDate;
use std::fmt;

/// A fully composed artifact base name, without extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    name: String,
    base_version: String,
    build_id: Option<String>,
    date: NaiveDate,
    digest: ContentDigest,
}

impl ArtifactName {
    /// Compose the artifact name from the configuration and computed digest.
    ///
    /// The build-id segment is omitted entirely when the resolved build id
    /// is the empty string. `today` is injected by the caller so builds and
    /// tests can pin the date.
    #[must_use]
    pub fn compose(config: &BuildConfig, digest: &ContentDigest, today: NaiveDate) -> Self {
        let build_id = if config.build_id.is_empty() {
            None
        } else {
            Some(config.build_id.clone())
        };
        Self {
            name: config.name.clone(),
            base_version: config.base_version.clone(),
            build_id,
            date: today,
            digest: digest.clone(),
        }
    }

    /// Return the content digest component.
    #[must_use]
    pub fn digest(&self) -> &ContentDigest {
        &self.digest
    }

    /// Return the composed name as an owned string.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.to_string()
    }

    /// Return the output file name for the given extension, e.g.
    /// `foo-1.0-2026.08.28-0123456789abcdef.zip`.
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        format!("{self}.{extension}")
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.base_version)?;
        if let Some(build_id) = &self.build_id {
            write!(f, "-{build_id}")?;
        }
        write!(f, "-{}-{}", self.date.format("%Y.%m.%d"), self.digest)
    }
}
