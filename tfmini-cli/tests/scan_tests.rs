use std::fs;
use tempfile::tempdir;

use tfmini_cli::commands::scan;
use tfmini_core::encoder::{encode_frame, FrameBuilder};

/// Helper: create a clean capture with sequential distances
fn create_test_capture(num_frames: u16) -> Vec<u8> {
    let mut result = Vec::new();
    for i in 0..num_frames {
        result.extend_from_slice(&encode_frame(100 + i, 500, 3));
    }
    result
}

/// Helper: create a capture with noise and a corrupted frame
fn create_damaged_capture() -> Vec<u8> {
    let mut data = b"BOOT OK\r\n".to_vec();
    data.extend_from_slice(&encode_frame(10, 0, 0));
    data.extend_from_slice(&FrameBuilder::new(20).corrupt_checksum().build());
    data.extend_from_slice(&encode_frame(30, 0, 0));
    data.extend_from_slice(&[0x59, 0x59, 0x01]);
    data
}

#[test]
fn test_scan_basic_file() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("capture.bin");
    let output_path = td.path().join("output.json");

    fs::write(&input_path, create_test_capture(3)).unwrap();

    scan::execute(
        input_path.to_str().unwrap(),
        Some(output_path.to_str().unwrap()),
        false,
    )
    .unwrap();

    assert!(output_path.exists());

    let output_json = fs::read_to_string(&output_path).unwrap();
    let frames: Vec<serde_json::Value> = serde_json::from_str(&output_json).unwrap();

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0]["offset"], 0);
    assert_eq!(frames[2]["offset"], 18);
    assert_eq!(frames[2]["distance"], 102);
}

#[test]
fn test_scan_damaged_file() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("damaged.bin");
    let output_path = td.path().join("damaged.json");

    fs::write(&input_path, create_damaged_capture()).unwrap();

    scan::execute(
        input_path.to_str().unwrap(),
        Some(output_path.to_str().unwrap()),
        false,
    )
    .unwrap();

    let output_json = fs::read_to_string(&output_path).unwrap();
    let frames: Vec<serde_json::Value> = serde_json::from_str(&output_json).unwrap();

    let distances: Vec<u64> = frames
        .iter()
        .map(|f| f["distance"].as_u64().unwrap())
        .collect();
    assert_eq!(distances, vec![10, 30]);
    assert_eq!(frames[0]["offset"], 9);
}

#[test]
fn test_scan_stats_only_writes_nothing() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("capture.bin");
    let output_path = td.path().join("unused.json");

    fs::write(&input_path, create_test_capture(2)).unwrap();

    scan::execute(
        input_path.to_str().unwrap(),
        Some(output_path.to_str().unwrap()),
        true,
    )
    .unwrap();

    assert!(!output_path.exists());
}

#[test]
fn test_scan_empty_file() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("empty.bin");
    fs::write(&input_path, []).unwrap();

    scan::execute(input_path.to_str().unwrap(), None, false).unwrap();
}

#[test]
fn test_scan_missing_file() {
    let td = tempdir().unwrap();
    let input_path = td.path().join("missing.bin");

    let result = scan::execute(input_path.to_str().unwrap(), None, false);

    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("Failed to read input file"));
}
