use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_missing_directory_is_empty() {
    let temp = tempdir().unwrap();
    let ids = scan_scripts(&temp.path().join("migrations")).unwrap();
    assert!(ids.is_empty());
}

#[test]
fn test_scan_sorts_and_filters() {
    let temp = tempdir().unwrap();
    let dir = temp.path();
    fs::write(dir.join("20240101000001-second.sql"), "-- up\n").unwrap();
    fs::write(dir.join("20240101000000-first.sql"), "-- up\n").unwrap();
    fs::write(dir.join("README.md"), "notes").unwrap();
    fs::write(dir.join("20240101000002-draft.sql.bak"), "").unwrap();
    fs::create_dir(dir.join("20240101000003-nested.sql")).unwrap();

    let ids = scan_scripts(dir).unwrap();
    assert_eq!(
        ids,
        vec![
            ScriptId::try_new("20240101000000-first").unwrap(),
            ScriptId::try_new("20240101000001-second").unwrap(),
        ]
    );
}

#[test]
fn test_malformed_names_are_listed() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("bootstrap.sql"), "").unwrap();
    fs::write(temp.path().join("20240101000000-a.sql"), "").unwrap();

    let ids = scan_scripts(temp.path()).unwrap();
    assert_eq!(ids.len(), 2);
    // Digits sort before letters, so well-formed ids come first.
    assert_eq!(ids[0], "20240101000000-a");
    assert_eq!(ids[1], "bootstrap");
}
