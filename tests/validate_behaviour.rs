//! Round-trip tests: build, unpack, validate.
//!
//! The round-trip property holds when packaged contents sit directly under
//! the archive's top-level directory, which is the layout the validator
//! re-hashes; the tests build with a `--chdir`-style root accordingly.

use artifact_packer::config::{ArchiveFormat, BuildConfig, TopDirPolicy};
use artifact_packer::pipeline::create_artifact;
use artifact_packer::validate::validate_unpacked;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

fn utf8(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp path")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 28).expect("valid date")
}

fn create_source(base: &Utf8Path) {
    fs::create_dir_all(base.join("payload/sub")).expect("mkdir");
    fs::write(base.join("payload/file1.txt"), "content").expect("write");
    fs::write(base.join("payload/file2.txt"), "file 2 content").expect("write");
    fs::write(base.join("payload/sub/subfile1.txt"), "sub content").expect("write");
}

/// Build from inside `payload` so its files land directly under the top
/// directory of the archive.
fn chdir_config(base: &Utf8Path, format: ArchiveFormat) -> BuildConfig {
    BuildConfig {
        name: "foo".to_owned(),
        base_version: "1.0".to_owned(),
        bits: 64,
        author: "builder".to_owned(),
        build_id: String::new(),
        build_branch: "main".to_owned(),
        build_date: "Fri Aug 28 12:00:00 2026".to_owned(),
        build_machine: "buildhost".to_owned(),
        os: "Linux".to_owned(),
        build_os: "Linux 6.8 x86_64".to_owned(),
        note: String::new(),
        roots: vec![Utf8PathBuf::from(".")],
        excluded: BTreeSet::new(),
        include_hidden: false,
        recurse: true,
        top_dir: TopDirPolicy::ArtifactName,
        format,
        output_dir: base.to_owned(),
        base_dir: base.join("payload"),
        silent: true,
    }
}

fn build(config: &BuildConfig) -> (Utf8PathBuf, String) {
    let mut out = Vec::new();
    let mut stderr = Vec::new();
    let outcome =
        create_artifact(config, today(), &mut out, &mut stderr).expect("build succeeds");
    (outcome.archive_path, outcome.artifact_name.full_name())
}

fn unpack_zip(archive_path: &Utf8Path, dest: &Utf8Path) {
    let file = fs::File::open(archive_path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("readable zip");
    archive.extract(dest.as_std_path()).expect("zip extracts");
}

fn unpack_tgz(archive_path: &Utf8Path, dest: &Utf8Path) {
    let file = fs::File::open(archive_path).expect("open archive");
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    archive.unpack(dest.as_std_path()).expect("tar extracts");
}

#[test]
fn unmodified_zip_round_trip_validates() {
    let dir = TempDir::new().expect("temp dir");
    let base = utf8(&dir);
    create_source(&base);

    let config = chdir_config(&base, ArchiveFormat::Zip);
    let (archive_path, name) = build(&config);

    let unpacked = base.join("unpacked");
    fs::create_dir(&unpacked).expect("mkdir");
    unpack_zip(&archive_path, &unpacked);

    let report = validate_unpacked(&unpacked.join(&name)).expect("validation runs");
    assert!(
        report.matches(),
        "actual {} != expected {}",
        report.actual,
        report.expected
    );
}

#[test]
fn unmodified_tgz_round_trip_validates() {
    let dir = TempDir::new().expect("temp dir");
    let base = utf8(&dir);
    create_source(&base);

    let config = chdir_config(&base, ArchiveFormat::TarGz);
    let (archive_path, name) = build(&config);

    let unpacked = base.join("unpacked");
    fs::create_dir(&unpacked).expect("mkdir");
    unpack_tgz(&archive_path, &unpacked);

    let report = validate_unpacked(&unpacked.join(&name)).expect("validation runs");
    assert!(report.matches());
}

#[test]
fn tampered_content_is_detected() {
    let dir = TempDir::new().expect("temp dir");
    let base = utf8(&dir);
    create_source(&base);

    let config = chdir_config(&base, ArchiveFormat::Zip);
    let (archive_path, name) = build(&config);

    let unpacked = base.join("unpacked");
    fs::create_dir(&unpacked).expect("mkdir");
    unpack_zip(&archive_path, &unpacked);

    fs::write(unpacked.join(&name).join("file1.txt"), "tampered").expect("write");
    let report = validate_unpacked(&unpacked.join(&name)).expect("validation runs");
    assert!(!report.matches());
}

#[test]
fn an_added_file_is_detected() {
    let dir = TempDir::new().expect("temp dir");
    let base = utf8(&dir);
    create_source(&base);

    let config = chdir_config(&base, ArchiveFormat::Zip);
    let (archive_path, name) = build(&config);

    let unpacked = base.join("unpacked");
    fs::create_dir(&unpacked).expect("mkdir");
    unpack_zip(&archive_path, &unpacked);

    fs::write(unpacked.join(&name).join("smuggled.txt"), "extra").expect("write");
    let report = validate_unpacked(&unpacked.join(&name)).expect("validation runs");
    assert!(!report.matches());
}

#[test]
fn archive_written_into_the_source_tree_never_packages_itself() {
    let dir = TempDir::new().expect("temp dir");
    let base = utf8(&dir);
    create_source(&base);

    // Output lands inside the directory being archived.
    let mut config = chdir_config(&base, ArchiveFormat::Zip);
    config.output_dir = base.join("payload");
    let (archive_path, name) = build(&config);

    let file = fs::File::open(archive_path.as_std_path()).expect("open archive");
    let archive = zip::ZipArchive::new(file).expect("readable zip");
    let own_entry = format!("{name}/{name}.zip");
    assert!(!archive.file_names().any(|entry| entry == own_entry));

    // And the hash recorded before the file existed still matches.
    let unpacked = base.join("unpacked");
    fs::create_dir(&unpacked).expect("mkdir");
    unpack_zip(&archive_path, &unpacked);
    let report = validate_unpacked(&unpacked.join(&name)).expect("validation runs");
    assert!(report.matches());
}
