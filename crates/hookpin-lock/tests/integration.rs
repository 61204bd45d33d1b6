//! Integration tests for hookpin-lock: file-name dispatch, normalization,
//! and version ordering end to end.

use hookpin_lock::{load_lock_files, parse_lock_file, Ecosystem, Error};
use tempfile::TempDir;

#[test]
fn test_load_package_lock_and_poetry_lock() {
    let temp_dir = TempDir::new().unwrap();
    let package_lock = temp_dir.path().join("package-lock.json");
    std::fs::write(
        &package_lock,
        r#"{
  "lockfileVersion": 3,
  "packages": {
    "": {"name": "test", "version": "1.0.0"},
    "node_modules/eslint": {"version": "8.50.0"},
    "node_modules/a/node_modules/eslint": {"version": "8.2.0"}
  }
}"#,
    )
    .unwrap();

    let poetry_lock = temp_dir.path().join("poetry.lock");
    std::fs::write(
        &poetry_lock,
        "[[package]]\nname = \"flake8\"\nversion = \"6.1.0\"\n",
    )
    .unwrap();

    let locks = load_lock_files(&[package_lock, poetry_lock]).unwrap();

    let node = locks.get(Ecosystem::Node).unwrap();
    // two installed copies, newest first
    assert_eq!(node.get("eslint").unwrap().len(), 2);
    assert_eq!(node.newest("eslint"), Some("8.50.0"));

    let python = locks.get(Ecosystem::Python).unwrap();
    assert_eq!(python.newest("flake8"), Some("6.1.0"));
}

#[test]
fn test_yarn_lock_dispatches_on_content() {
    let temp_dir = TempDir::new().unwrap();
    let yarn_lock = temp_dir.path().join("yarn.lock");

    std::fs::write(
        &yarn_lock,
        "# yarn lockfile v1\n\neslint@^8.0.0:\n  version \"8.50.0\"\n",
    )
    .unwrap();
    let (ecosystem, classic) = parse_lock_file(&yarn_lock).unwrap();
    assert_eq!(ecosystem, Ecosystem::Node);
    assert_eq!(classic.newest("eslint"), Some("8.50.0"));

    std::fs::write(
        &yarn_lock,
        "__metadata:\n  version: 8\n\n\"eslint@npm:^8.0.0\":\n  version: 8.50.0\n",
    )
    .unwrap();
    let (_, berry) = parse_lock_file(&yarn_lock).unwrap();
    assert_eq!(berry.newest("eslint"), Some("8.50.0"));
}

#[test]
fn test_duplicate_ecosystem_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("package-lock.json");
    std::fs::write(&first, r#"{"lockfileVersion": 3, "packages": {}}"#).unwrap();
    let second = temp_dir.path().join("yarn.lock");
    std::fs::write(&second, "# yarn lockfile v1\n").unwrap();

    let err = load_lock_files(&[first, second]).unwrap_err();
    assert!(matches!(err, Error::DuplicateEcosystem(Ecosystem::Node)));
}

#[test]
fn test_unsupported_lock_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Gemfile.lock");
    std::fs::write(&path, "").unwrap();

    let err = parse_lock_file(&path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedLockFile(_)));
}
