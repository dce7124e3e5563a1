//! Integration tests for seedai-store
//!
//! These tests verify the on-disk corpus layout and deduplication.

use seedai_store::{save_seeds, seed_hash, SeedStore};
use std::fs;

#[test]
fn test_stored_bytes_and_names() {
    let tmp = tempfile::tempdir().unwrap();
    let store = SeedStore::new(tmp.path());

    let seeds = ["\u{00ff}\u{0000}", "\u{0000}", "\u{00ff}hello world\u{0001}"];
    let mut third = vec![0xC3, 0xBF];
    third.extend_from_slice(b"hello world");
    third.push(0x01);
    let expected: Vec<Vec<u8>> = vec![vec![0xC3, 0xBF, 0x00], vec![0x00], third];

    let written = store.save(&seeds).unwrap();
    assert_eq!(written, 3);

    for bytes in &expected {
        let path = tmp.path().join(seed_hash(bytes));
        assert!(path.exists(), "File {} does not exist", path.display());
        assert_eq!(&fs::read(&path).unwrap(), bytes);
    }
}

#[test]
fn test_second_save_is_a_no_op() {
    let tmp = tempfile::tempdir().unwrap();
    let seeds = vec!["alpha".to_string(), "beta".to_string(), "alpha".to_string()];

    let first = save_seeds(tmp.path(), &seeds).unwrap();
    let second = save_seeds(tmp.path(), &seeds).unwrap();

    assert_eq!(first, 2);
    assert_eq!(second, 0);
    assert_eq!(SeedStore::new(tmp.path()).len().unwrap(), 2);
}

#[test]
fn test_existing_entry_is_not_rewritten() {
    let tmp = tempfile::tempdir().unwrap();
    let store = SeedStore::new(tmp.path());
    store.save(&["stable"]).unwrap();

    let path = store.path_for(&seed_hash(b"stable"));
    let before = fs::metadata(&path).unwrap().modified().unwrap();

    assert_eq!(store.save(&["stable"]).unwrap(), 0);
    let after = fs::metadata(&path).unwrap().modified().unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_no_temp_files_left_behind() {
    let tmp = tempfile::tempdir().unwrap();
    let store = SeedStore::new(tmp.path());
    store.save(&["one", "two", "three"]).unwrap();

    let names: Vec<String> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|n| n.len() == 40));
}

#[test]
fn test_entries_are_sorted_and_verified() {
    let tmp = tempfile::tempdir().unwrap();
    let store = SeedStore::new(tmp.path());
    store.save(&["c", "a", "b"]).unwrap();

    let entries = store.entries().unwrap();
    let mut sorted = entries.clone();
    sorted.sort();
    assert_eq!(entries, sorted);
    assert!(store.verify().unwrap().is_empty());
}

#[test]
fn test_empty_seed_is_stored() {
    let tmp = tempfile::tempdir().unwrap();
    let store = SeedStore::new(tmp.path());
    assert_eq!(store.save(&[""]).unwrap(), 1);
    assert_eq!(fs::read(store.path_for(&seed_hash(b""))).unwrap(), b"");
}
