// bilimux-core/tests/discovery_tests.rs
//
// Exercises item-directory and segment discovery against a real
// directory layout.

use bilimux_core::discovery::{find_item_dirs, find_segments};
use bilimux_core::CoreError;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn mkdir(base: &Path, name: &str) {
    fs::create_dir(base.join(name)).expect("Failed to create test directory");
}

fn touch(base: &Path, name: &str) {
    fs::write(base.join(name), b"x").expect("Failed to create test file");
}

#[test]
fn finds_only_all_digit_directories() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    mkdir(base.path(), "12");
    mkdir(base.path(), "7");
    mkdir(base.path(), "abc");
    mkdir(base.path(), "12abc");
    touch(base.path(), "34"); // a file, even if numeric, is not an item

    let dirs = find_item_dirs(base.path())?;

    let names: Vec<_> = dirs
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["7", "12"]);
    Ok(())
}

#[test]
fn item_directories_come_back_in_numeric_order() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    for name in ["10", "2", "100", "9"] {
        mkdir(base.path(), name);
    }

    let dirs = find_item_dirs(base.path())?;

    let names: Vec<_> = dirs
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["2", "9", "10", "100"]);
    Ok(())
}

#[test]
fn an_empty_base_reports_no_items() -> Result<(), Box<dyn std::error::Error>> {
    let base = tempdir()?;
    mkdir(base.path(), "not-an-item");

    let result = find_item_dirs(base.path());

    assert!(matches!(result, Err(CoreError::NoItemsFound)));
    Ok(())
}

#[test]
fn finds_segments_by_extension_case_insensitively() -> Result<(), Box<dyn std::error::Error>> {
    let item = tempdir()?;
    touch(item.path(), "1.m4s");
    touch(item.path(), "2.M4S");
    touch(item.path(), "cover.jpg");
    touch(item.path(), "videoInfo.json");
    mkdir(item.path(), "nested.m4s"); // a directory never counts

    let segments = find_segments(item.path())?;

    let names: Vec<_> = segments
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["1.m4s", "2.M4S"]);
    Ok(())
}

#[test]
fn an_item_without_segments_yields_an_empty_list() -> Result<(), Box<dyn std::error::Error>> {
    let item = tempdir()?;
    touch(item.path(), "videoInfo.json");

    let segments = find_segments(item.path())?;

    assert!(segments.is_empty());
    Ok(())
}
