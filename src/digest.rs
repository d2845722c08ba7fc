//! Content digest newtype for artifact addressing.
//!
//! Validates that the value is a 16-character lowercase hexadecimal string:
//! the first 16 hex characters of a SHA-1 digest over a directory tree's
//! relative paths and file bytes. The same truncation is applied everywhere
//! the digest is displayed or compared, so generation and validation always
//! agree.

use crate::error::{PackerError, Result};
use sha1::{Digest, Sha1};
use std::fmt;

/// Number of hex characters retained from the full SHA-1 digest.
pub const DIGEST_HEX_LEN: usize = 16;

/// A validated, truncated hex digest of directory contents.
///
/// # Examples
///
/// ```
/// use artifact_packer::digest::ContentDigest;
///
/// let digest: ContentDigest = "0123456789abcdef".try_into().unwrap();
/// assert_eq!(digest.as_str().len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Finalize a running SHA-1 state into a truncated digest.
    #[must_use]
    pub fn from_sha1(hasher: Sha1) -> Self {
        let mut hex = format!("{:x}", hasher.finalize());
        hex.truncate(DIGEST_HEX_LEN);
        Self(hex)
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ContentDigest {
    type Error = PackerError;

    fn try_from(value: &str) -> Result<Self> {
        validate_digest(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = PackerError;

    fn try_from(value: String) -> Result<Self> {
        validate_digest(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for ContentDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a truncated lowercase hex digest.
fn validate_digest(value: &str) -> Result<()> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(PackerError::InvalidDigest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !c.is_ascii_hexdigit() || c.is_ascii_uppercase())
    {
        return Err(PackerError::InvalidDigest {
            reason: format!("invalid character '{bad}'"),
        });
    }
    Ok(())
}
