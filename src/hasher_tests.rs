//! Unit tests for the content hasher.

use super::*;
use rstest::{fixture, rstest};
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("temp dir creation succeeds")
}

fn utf8(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp path")
}

fn default_filter() -> PathFilter {
    PathFilter::new(true, false, BTreeSet::new())
}

fn populate(base: &Utf8Path) {
    fs::create_dir_all(base.join("src/sub")).expect("mkdir");
    fs::write(base.join("src/file1.txt"), "content").expect("write");
    fs::write(base.join("src/file2.txt"), "file 2 content").expect("write");
    fs::write(base.join("src/sub/subfile1.txt"), "sub/subfile1 content").expect("write");
    fs::write(base.join("src/.hidden.txt"), "hidden content").expect("write");
}

fn hash_src(base: &Utf8Path) -> ContentDigest {
    hash_contents(base, &[Utf8PathBuf::from("src")], &default_filter()).expect("hash succeeds")
}

#[rstest]
fn identical_trees_hash_identically(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    fs::create_dir_all(base.join("a")).expect("mkdir");
    fs::create_dir_all(base.join("b")).expect("mkdir");
    populate(&base.join("a"));
    populate(&base.join("b"));

    let first = hash_src(&base.join("a"));
    let second = hash_src(&base.join("b"));
    assert_eq!(first, second);
}

#[rstest]
fn root_order_does_not_affect_the_digest(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    fs::create_dir_all(base.join("extra")).expect("mkdir");
    fs::write(base.join("extra/more.txt"), "more").expect("write");

    let forward = hash_contents(
        &base,
        &[Utf8PathBuf::from("extra"), Utf8PathBuf::from("src")],
        &default_filter(),
    )
    .expect("hash succeeds");
    let reverse = hash_contents(
        &base,
        &[Utf8PathBuf::from("src"), Utf8PathBuf::from("extra")],
        &default_filter(),
    )
    .expect("hash succeeds");
    assert_eq!(forward, reverse);
}

#[rstest]
fn changing_file_content_changes_the_digest(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    let before = hash_src(&base);

    fs::write(base.join("src/file1.txt"), "different").expect("write");
    let after = hash_src(&base);
    assert_ne!(before, after);
}

#[rstest]
fn renaming_a_file_changes_the_digest(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    let before = hash_src(&base);

    fs::rename(base.join("src/file1.txt"), base.join("src/file9.txt")).expect("rename");
    let after = hash_src(&base);
    assert_ne!(before, after);
}

#[rstest]
fn moving_a_file_within_the_tree_changes_the_digest(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    let before = hash_src(&base);

    fs::rename(base.join("src/file1.txt"), base.join("src/sub/file1.txt")).expect("move");
    let after = hash_src(&base);
    assert_ne!(before, after);
}

#[rstest]
fn hidden_files_do_not_contribute_under_the_default_policy(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    let before = hash_src(&base);

    fs::write(base.join("src/.another-hidden"), "noise").expect("write");
    let after = hash_src(&base);
    assert_eq!(before, after);
}

#[rstest]
fn excluded_files_do_not_contribute(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    let excluding: BTreeSet<String> = ["file2.txt".to_owned()].into();
    let filter = PathFilter::new(true, false, excluding);

    let with_file2 = hash_src(&base);
    let without_file2 =
        hash_contents(&base, &[Utf8PathBuf::from("src")], &filter).expect("hash succeeds");
    assert_ne!(with_file2, without_file2);

    fs::remove_file(base.join("src/file2.txt")).expect("remove");
    let removed = hash_contents(&base, &[Utf8PathBuf::from("src")], &filter).expect("hash");
    assert_eq!(without_file2, removed);
}

#[rstest]
fn manifest_files_never_contribute(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    let before = hash_src(&base);

    fs::write(base.join("src/foo-manifest.txt"), "stray manifest").expect("write");
    let after = hash_src(&base);
    assert_eq!(before, after);
}

#[rstest]
fn a_file_root_contributes_its_path_only(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    fs::write(base.join("standalone.bin"), "payload").expect("write");

    let first = hash_contents(
        &base,
        &[Utf8PathBuf::from("standalone.bin")],
        &default_filter(),
    )
    .expect("hash succeeds");

    // Content changes are invisible for file roots; only the path is fed.
    fs::write(base.join("standalone.bin"), "other payload").expect("write");
    let second = hash_contents(
        &base,
        &[Utf8PathBuf::from("standalone.bin")],
        &default_filter(),
    )
    .expect("hash succeeds");
    assert_eq!(first, second);
}

#[cfg(unix)]
#[rstest]
fn hidden_dangling_symlink_does_not_abort_hashing(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    let before = hash_src(&base);

    // Editor lock symlink with no target; the default policy drops it by
    // name before anything tries to stat or open it.
    std::os::unix::fs::symlink("missing-target", base.join("src/.#file1.txt").as_std_path())
        .expect("symlink");
    let after = hash_src(&base);
    assert_eq!(before, after);
}

#[cfg(unix)]
#[rstest]
fn admitted_dangling_symlink_reports_a_read_error(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    std::os::unix::fs::symlink("missing-target", base.join("src/broken.txt").as_std_path())
        .expect("symlink");

    let result = hash_contents(&base, &[Utf8PathBuf::from("src")], &default_filter());
    assert!(matches!(
        result,
        Err(PackerError::HashRead { path, .. }) if path.as_str().ends_with("broken.txt")
    ));
}

#[rstest]
fn missing_root_is_reported_as_not_found(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    let result = hash_contents(&base, &[Utf8PathBuf::from("nowhere")], &default_filter());
    assert!(matches!(
        result,
        Err(PackerError::RootNotFound { path }) if path == Utf8PathBuf::from("nowhere")
    ));
}

#[rstest]
fn digest_is_sixteen_hex_chars(temp_dir: TempDir) {
    let base = utf8(&temp_dir);
    populate(&base);
    let digest = hash_src(&base);
    assert_eq!(digest.as_str().len(), 16);
    assert!(digest.as_str().chars().all(|c| c.is_ascii_hexdigit()));
}
