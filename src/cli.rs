//! CLI argument definitions for the artifact packer.
//!
//! Defines the command-line interface using clap. Separated from the main
//! entrypoint so the binary stays focused on orchestration and the parse
//! surface can be exercised directly in tests.

use camino::Utf8PathBuf;
use clap::Parser;

/// Package directories into a hash-addressed zip or tar.gz artifact.
#[derive(Parser, Debug)]
#[command(name = "artifact-packer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package directories into a hash-addressed zip or tar.gz artifact.\n\n",
    "The archive is named NAME-VER[-BUILD]-DATE-HASH.{zip,tgz} and embeds a ",
    "generated manifest recording build provenance and a deterministic ",
    "content hash, so the result looks like:\n\n",
    "  NAME-VER-BUILD-DATE-HASH/\n",
    "    NAME-manifest.txt\n",
    "    dir1/\n",
    "    dir2/\n",
    "      ...\n\n",
    "The content hash is stable across host OS and filesystem enumeration ",
    "order, and --validate re-checks an unpacked archive against the hash ",
    "recorded in its manifest.",
))]
pub struct Cli {
    /// Base version for the manifest and artifact name.
    #[arg(long, short = 'B')]
    pub base_version: String,

    /// Artifact name (human readable), e.g. 'mocha-bcc-mac'.
    #[arg(long, short = 'n')]
    pub name: String,

    /// Word size of the packaged build (32 or 64).
    #[arg(long, short = 'b', default_value_t = 64)]
    pub bits: u32,

    /// Build ID [default: short git revision of HEAD].
    #[arg(long, short = 'i')]
    pub build_id: Option<String>,

    /// Build branch [default: current git branch].
    #[arg(long, alias = "branch")]
    pub build_branch: Option<String>,

    /// Build date [default: current local time].
    #[arg(long, short = 'D', alias = "date")]
    pub build_date: Option<String>,

    /// Build machine [default: host name].
    #[arg(long, short = 'm', alias = "machine")]
    pub build_machine: Option<String>,

    /// Target OS name [default: platform OS].
    #[arg(long, short = 'o')]
    pub os: Option<String>,

    /// Build machine OS description [default: platform description].
    #[arg(long, short = 'O')]
    pub build_os: Option<String>,

    /// Note to put in the manifest (one line).
    #[arg(long, short = 'N')]
    pub note: Option<String>,

    /// Person (username/email) building the archive [default: current user].
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Resolve input dirs against this directory instead of changing into
    /// it; useful to keep intervening directory names out of the archive.
    #[arg(long, short = 'C', value_name = "DIR")]
    pub chdir: Option<Utf8PathBuf>,

    /// Directory in which to create the output zip/tar file.
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub outdir: Utf8PathBuf,

    /// Skip printing the manifest contents on stdout.
    #[arg(long, short = 's')]
    pub silent: bool,

    /// Create a tar (tgz) file instead of zip.
    #[arg(long, short = 'T')]
    pub tar: bool,

    /// Don't build the archive; just print the artifact name (hashes contents).
    #[arg(long)]
    pub name_only: bool,

    /// Don't build the archive; just print the content hash of the given dirs.
    #[arg(long)]
    pub hash_only: bool,

    /// Validate an unpacked archive by checking its hash against the manifest.
    #[arg(long)]
    pub validate: bool,

    /// Exclude this file or directory name everywhere it appears. May be repeated.
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Top-level directory name inside the archive; '.' for none
    /// [default: the artifact name].
    #[arg(long, short = 't', value_name = "NAME")]
    pub top_dir_name: Option<String>,

    /// Archive only the direct children of the given dirs.
    #[arg(long)]
    pub no_recurse: bool,

    /// Include hidden (dot-prefixed) files and directories.
    #[arg(long)]
    pub include_hidden: bool,

    /// Trace every file fed into the content hash.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Directories to collect into the artifact.
    #[arg(value_name = "DIR", required = true)]
    pub dir: Vec<Utf8PathBuf>,
}

/// Mutually exclusive operating modes, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Check an unpacked archive against its recorded hash.
    Validate,
    /// Print the content hash only.
    HashOnly,
    /// Print the composed artifact name only.
    NameOnly,
    /// Build the archive (the default).
    Build,
}

impl Cli {
    /// Resolve the operating mode, applying the fixed priority
    /// validate > hash-only > name-only > build.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.validate {
            Mode::Validate
        } else if self.hash_only {
            Mode::HashOnly
        } else if self.name_only {
            Mode::NameOnly
        } else {
            Mode::Build
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
