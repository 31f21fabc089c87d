//! Fuzzing harness functions for tfmini-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_decoder

use tfmini_core::{DecodeError, Frame, FrameDecoder};

/// Decode every frame in `data`; must never panic or return an unchecked frame
pub fn fuzz_decode(data: &[u8]) {
    for result in FrameDecoder::new(data) {
        match result {
            Ok(frame) => assert_eq!(frame.checksum(), frame.compute_checksum()),
            Err(e) => assert!(matches!(e, DecodeError::Truncated { .. })),
        }
    }
}

/// Strictly parse `data` as a single frame; must never panic
pub fn fuzz_parse(data: &[u8]) {
    let _ = Frame::from_bytes(data);
}

/// Scan `data` as a capture; must never panic
pub fn fuzz_scan(data: &[u8]) {
    use tfmini_core::scanner::scan_stream_with_stats;

    let (located, stats) = scan_stream_with_stats(data);
    assert_eq!(located.len(), stats.frames_decoded);
    assert_eq!(stats.bytes_read, data.len());
}
