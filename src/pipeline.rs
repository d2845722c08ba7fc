//! Build orchestration: from configuration record to finished artifact.
//!
//! Ties the core components together in their fixed order: hash the input
//! roots, compose the artifact name, render the manifest, sweep stray
//! manifests out of the source tree, then assemble the archive. Also hosts
//! the CLI-glue resolution of a [`BuildConfig`] from parsed arguments plus
//! metadata defaults.

use crate::archive::build_archive;
use crate::cli::Cli;
use crate::config::{ArchiveFormat, BuildConfig, TopDirPolicy};
use crate::digest::ContentDigest;
use crate::error::Result;
use crate::filter::PathFilter;
use crate::hasher::hash_contents;
use crate::manifest::{remove_stray_manifests, ManifestRecord};
use crate::metadata;
use crate::naming::ArtifactName;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use std::io::Write;

/// Result of a successful archive build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Path of the archive that was written.
    pub archive_path: Utf8PathBuf,
    /// The composed artifact name.
    pub artifact_name: ArtifactName,
}

/// Build the configuration record from parsed arguments.
///
/// Fields the user did not supply are filled from metadata lookups; a
/// lookup that fails degrades to a default with a warning on `stderr`,
/// never an error. `--chdir` and `--outdir` are resolved against `cwd`
/// here so the core components work on explicit paths and the process
/// working directory is never changed.
pub fn resolve_config(cli: &Cli, cwd: &Utf8Path, stderr: &mut dyn Write) -> BuildConfig {
    let build_id = resolve_default(cli.build_id.clone(), metadata::git_revision, "--build-id", stderr);
    let build_branch = resolve_default(
        cli.build_branch.clone(),
        metadata::git_branch,
        "--build-branch",
        stderr,
    );
    let build_machine = resolve_default(
        cli.build_machine.clone(),
        metadata::host_name,
        "--build-machine",
        stderr,
    );
    let author = resolve_default(cli.author.clone(), metadata::current_user, "--author", stderr);

    BuildConfig {
        name: cli.name.clone(),
        base_version: cli.base_version.clone(),
        bits: cli.bits,
        author,
        build_id,
        build_branch,
        build_date: cli
            .build_date
            .clone()
            .unwrap_or_else(metadata::build_timestamp),
        build_machine,
        os: cli.os.clone().unwrap_or_else(metadata::platform_os),
        build_os: cli.build_os.clone().unwrap_or_else(|| {
            metadata::platform_description().unwrap_or_else(metadata::platform_os)
        }),
        note: cli.note.clone().unwrap_or_default(),
        roots: cli.dir.clone(),
        excluded: cli.exclude.iter().cloned().collect(),
        include_hidden: cli.include_hidden,
        recurse: !cli.no_recurse,
        top_dir: TopDirPolicy::from_cli(cli.top_dir_name.as_deref()),
        format: if cli.tar {
            ArchiveFormat::TarGz
        } else {
            ArchiveFormat::Zip
        },
        output_dir: cwd.join(&cli.outdir),
        base_dir: cli
            .chdir
            .as_ref()
            .map_or_else(|| cwd.to_owned(), |chdir| cwd.join(chdir)),
        silent: cli.silent,
    }
}

fn resolve_default(
    given: Option<String>,
    lookup: fn() -> Option<String>,
    flag: &str,
    stderr: &mut dyn Write,
) -> String {
    if let Some(value) = given {
        return value;
    }
    lookup().unwrap_or_else(|| {
        log::warn!("can't resolve default for {flag}; leaving it empty");
        let _ = writeln!(stderr, "Warning: can't get default value for {flag}; using empty.");
        String::new()
    })
}

/// The filter shared by hashing and archiving, from the active policies.
#[must_use]
pub fn content_filter(config: &BuildConfig) -> PathFilter {
    PathFilter::new(config.recurse, config.include_hidden, config.excluded.clone())
}

/// Compute the content hash of the configured input roots.
///
/// # Errors
///
/// Propagates hashing errors (missing root, unreadable file).
pub fn compute_hash(config: &BuildConfig) -> Result<ContentDigest> {
    hash_contents(&config.base_dir, &config.roots, &content_filter(config))
}

/// Hash the inputs and compose the artifact name for `today`.
///
/// # Errors
///
/// Propagates hashing errors.
pub fn compose_name(config: &BuildConfig, today: NaiveDate) -> Result<ArtifactName> {
    let digest = compute_hash(config)?;
    Ok(ArtifactName::compose(config, &digest, today))
}

/// Build the artifact end to end and return the written path.
///
/// Echoes the manifest to `out` and reports progress to `stderr` unless the
/// configuration is silent. The temporary manifest file is removed on every
/// path, including archive-assembly failure.
///
/// # Errors
///
/// Propagates hashing, manifest, and archive errors.
pub fn create_artifact(
    config: &BuildConfig,
    today: NaiveDate,
    out: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<BuildOutcome> {
    let digest = compute_hash(config)?;
    let artifact_name = ArtifactName::compose(config, &digest, today);

    let record = ManifestRecord::new(config, &artifact_name.full_name(), &digest)?;
    if !config.silent {
        let _ = out.write_all(record.render().as_bytes());
    }

    // Dropped at the end of this function, deleting the file even when
    // archive assembly fails.
    let temp_manifest = record.write_temp(&config.name)?;

    remove_stray_manifests(config, stderr)?;

    let output_name = artifact_name.file_name(config.format.extension());
    let filter = content_filter(config).with_output_file_name(output_name);
    let archive_path = build_archive(config, &artifact_name, temp_manifest.path(), &filter)?;

    if !config.silent {
        let _ = writeln!(out, "Wrote {archive_path}");
    }
    let _ = writeln!(stderr, "Created binary artifact {archive_path}");

    Ok(BuildOutcome {
        archive_path,
        artifact_name,
    })
}
