// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lp_core::test_support::trigger_set;
use proptest::prelude::*;

const DOCKERFILE_HASH: &str = "f6aca399ab7883e1ebdf61b6d22756df83626409f824c0f6d80c2148478769b2";
const PACKAGE_HASH: &str = "e2c193459707068888808a4e89c745162ed4e24bc093ac72f0009f5f15992cbb";

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Dockerfile"), "Dockerfile contents").unwrap();
    std::fs::write(dir.path().join("package.json"), "package.json contents").unwrap();
    dir
}

#[tokio::test]
async fn hash_file_known_digests() {
    let dir = project();
    assert_eq!(hash_file(&dir.path().join("Dockerfile")).await.unwrap(), DOCKERFILE_HASH);
    assert_eq!(hash_file(&dir.path().join("package.json")).await.unwrap(), PACKAGE_HASH);
}

#[tokio::test]
async fn hash_file_sha512_length() {
    let dir = project();
    let digest =
        hash_file_with(&dir.path().join("Dockerfile"), HashAlgorithm::Sha512).await.unwrap();
    assert_eq!(digest.len(), 128);
}

#[tokio::test]
async fn hash_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = hash_file(&dir.path().join("nope")).await.unwrap_err();
    assert!(matches!(err, TriggerError::Io { .. }));
}

#[tokio::test]
async fn implicit_triggers_are_always_included() {
    let dir = project();
    let set = build_trigger_set(&[], dir.path(), true).await.unwrap();
    assert_eq!(set.paths(), vec!["Dockerfile", "package.json"]);
    assert_eq!(set.hash_of("Dockerfile"), Some(DOCKERFILE_HASH));
    assert_eq!(set.hash_of("package.json"), Some(PACKAGE_HASH));
}

#[tokio::test]
async fn spellings_of_one_file_collapse() {
    let dir = project();
    let abs = dir.path().join("Dockerfile").to_string_lossy().into_owned();
    let files = vec![
        "./Dockerfile".to_string(),
        " Dockerfile ".to_string(),
        abs,
        "lib/../Dockerfile".to_string(),
        "".to_string(),
        "   ".to_string(),
    ];
    let set = build_trigger_set(&files, dir.path(), true).await.unwrap();
    assert_eq!(set.paths(), vec!["Dockerfile", "package.json"]);
}

#[tokio::test]
async fn user_files_come_first_and_stay_relative() {
    let dir = project();
    std::fs::create_dir(dir.path().join("config")).unwrap();
    std::fs::write(dir.path().join("config/app.yml"), "a: 1").unwrap();
    let set = build_trigger_set(&["config/app.yml".to_string()], dir.path(), true).await.unwrap();
    assert_eq!(set.paths(), vec!["config/app.yml", "Dockerfile", "package.json"]);
}

#[tokio::test]
async fn files_outside_base_use_parent_segments() {
    let root = tempfile::tempdir().unwrap();
    let base = root.path().join("app");
    std::fs::create_dir(&base).unwrap();
    std::fs::write(root.path().join("shared.txt"), "x").unwrap();
    let set = build_trigger_set(&["../shared.txt".to_string()], &base, true).await.unwrap();
    assert_eq!(set.paths(), vec!["../shared.txt"]);
}

#[tokio::test]
async fn missing_files_skipped_or_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Dockerfile"), "Dockerfile contents").unwrap();

    let set = build_trigger_set(&["extra.txt".to_string()], dir.path(), true).await.unwrap();
    assert_eq!(set.paths(), vec!["Dockerfile"]);

    let err = build_trigger_set(&["extra.txt".to_string()], dir.path(), false).await.unwrap_err();
    assert!(matches!(err, TriggerError::MissingFile(ref f) if f == "extra.txt"), "{err:?}");
}

#[tokio::test]
async fn unchanged_triggers_are_not_changed() {
    let dir = project();
    let set = build_trigger_set(&[], dir.path(), true).await.unwrap();
    assert!(!check_triggers(&set, dir.path()).await);
}

#[tokio::test]
async fn empty_set_is_not_changed() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!check_triggers(&TriggerSet::default(), dir.path()).await);
}

#[tokio::test]
async fn deleted_trigger_is_changed() {
    let dir = project();
    let set = build_trigger_set(&[], dir.path(), true).await.unwrap();
    std::fs::remove_file(dir.path().join("package.json")).unwrap();
    assert!(check_triggers(&set, dir.path()).await);
}

#[tokio::test]
async fn modified_trigger_is_changed() {
    let dir = project();
    let set = build_trigger_set(&[], dir.path(), true).await.unwrap();
    std::fs::write(dir.path().join("Dockerfile"), "FROM alpine").unwrap();
    assert!(check_triggers(&set, dir.path()).await);
}

#[tokio::test]
async fn stored_hash_mismatch_is_changed() {
    let dir = project();
    let set = trigger_set(&[("Dockerfile", DOCKERFILE_HASH), ("package.json", "stale")]);
    assert!(check_triggers(&set, dir.path()).await);
}

#[tokio::test]
async fn unreadable_trigger_fails_open() {
    let dir = project();
    // A directory where a file is expected: open succeeds, read fails.
    std::fs::create_dir(dir.path().join("weird")).unwrap();
    let set = trigger_set(&[("weird", "abc")]);
    assert!(check_triggers(&set, dir.path()).await);
}

#[yare::parameterized(
    dot = { "/a/./b", "/a/b" },
    parent = { "/a/b/../c", "/a/c" },
    trailing = { "/a/b/", "/a/b" },
    relative_parent = { "../x", "../x" },
    double_parent = { "../../x", "../../x" },
)]
fn normalize_paths(input: &str, expected: &str) {
    assert_eq!(normalize(Path::new(input)), PathBuf::from(expected));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn one_entry_per_underlying_file(picks in proptest::collection::vec(0usize..4, 1..8)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let dir = project();
        let abs = dir.path().join("Dockerfile").to_string_lossy().into_owned();
        let spellings = ["Dockerfile".to_string(), "./Dockerfile".to_string(), "x/../Dockerfile".to_string(), abs];
        let files: Vec<String> = picks.iter().map(|i| spellings[*i].clone()).collect();
        let set = rt.block_on(build_trigger_set(&files, dir.path(), true)).unwrap();
        prop_assert_eq!(set.len(), 2);
    }
}
