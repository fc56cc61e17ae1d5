//! Harvest integration tests
//!
//! Exercise discovery, filtering and decoding against real directory trees.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tlog2ninja::error::HarvestError;
use tlog2ninja::formats::{load_json, save_json};
use tlog2ninja::harvest::{harvest, HarvestedLogs, LogEncoding, LogHarvester};

fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

fn write_log(root: &Path, rel: &str, records: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let text = format!("\u{feff}^HEADER\r\n{}", records);
    fs::write(path, utf16le(&text)).unwrap();
}

fn build_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_log(
        temp.path(),
        "app/x64/Debug/app.tlog/CL.command.1.tlog",
        "/c /D_DEBUG main.cpp\r\n",
    );
    write_log(
        temp.path(),
        "app/x64/Release/app.tlog/CL.command.1.tlog",
        "/c /DNDEBUG main.cpp\r\n^C:\\APP\\UTIL.CPP\r\n/c /DNDEBUG util.cpp\r\n",
    );
    write_log(
        temp.path(),
        "app/x64/Release/app.tlog/CL.read.1.tlog",
        "C:\\APP\\MAIN.CPP\r\n",
    );
    temp
}

#[test]
fn test_filter_keeps_matching_paths_only() {
    let temp = build_tree();

    let logs = harvest(temp.path(), "CL.command*.tlog", Some("Release")).unwrap();

    assert_eq!(logs.len(), 1);
    let path = logs.log_files().next().unwrap();
    assert!(path.is_absolute());
    assert!(path.to_string_lossy().contains("Release"));
    assert_eq!(
        logs.get(path).unwrap().to_vec(),
        vec!["/c /DNDEBUG main.cpp\n", "/c /DNDEBUG util.cpp\n"]
    );
}

#[test]
fn test_without_filter_all_command_logs_harvested() {
    let temp = build_tree();

    let logs = harvest(temp.path(), "CL.command*.tlog", None).unwrap();

    assert_eq!(logs.len(), 2);
    assert_eq!(logs.record_count(), 3);
    assert!(logs
        .log_files()
        .all(|p| p.file_name().unwrap() == "CL.command.1.tlog"));
}

#[test]
fn test_record_attribution() {
    let temp = build_tree();
    let logs = harvest(temp.path(), "CL.command*.tlog", Some("Release")).unwrap();

    let raws: Vec<_> = logs.raw_invocations().collect();
    assert_eq!(raws.len(), 2);
    assert_eq!(raws[0].record, 1);
    assert_eq!(raws[1].record, 2);
    assert!(raws[1].text.contains("util.cpp"));
}

#[test]
fn test_filter_excluding_everything() {
    let temp = build_tree();

    let err = harvest(temp.path(), "CL.command*.tlog", Some("Profile")).unwrap_err();
    assert!(matches!(err, HarvestError::FilteredOut { .. }));
    assert!(err.is_empty_result());
}

#[test]
fn test_missing_directory_is_fatal() {
    let temp = TempDir::new().unwrap();
    let err = harvest(temp.path().join("missing"), "*.tlog", None).unwrap_err();

    assert!(matches!(err, HarvestError::DirectoryNotFound(_)));
    assert!(!err.is_empty_result());
}

#[test]
fn test_utf8_logs() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Debug/CL.command.1.tlog");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "^HEADER\n/c a.cpp\n").unwrap();

    let logs = LogHarvester::new(temp.path(), "CL.command*.tlog")
        .unwrap()
        .with_encoding(LogEncoding::Utf8)
        .harvest()
        .unwrap();

    assert_eq!(logs.record_count(), 1);
}

#[test]
fn test_harvest_file_roundtrip() {
    let temp = build_tree();
    let logs = harvest(temp.path(), "CL.command*.tlog", None).unwrap();

    let file = temp.path().join("tlogs.json");
    save_json(&file, &logs).unwrap();
    let loaded: HarvestedLogs = load_json(&file).unwrap();

    assert_eq!(loaded, logs);
}
