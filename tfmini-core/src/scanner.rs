//! Header scanning: locating the two-byte frame marker in an unstructured stream

use crate::constants::{FRAME_LEN, MARKER_LEN, SYNC_BYTE};
use crate::decoder::{DecodeStats, FrameDecoder};
use crate::error::DecodeError;
use crate::types::Frame;
use std::io::{ErrorKind, Read};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Stream position right after a marker pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Checksum accumulator seeded with both marker bytes
    pub seed: u32,

    /// Noise bytes consumed before the marker pair
    pub skipped: usize,
}

/// Outcome of a header scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Both marker bytes were seen back to back
    Aligned(Alignment),

    /// The stream ended before a marker pair was found
    EndOfStream {
        /// Bytes consumed by this scan
        consumed: usize,

        /// Marker bytes seen at the very end of the stream (0 or 1)
        pending: usize,
    },
}

/// Read a single byte, retrying interrupted reads
///
/// Returns `Ok(None)` at end of stream.
pub(crate) fn read_byte<R: Read>(reader: &mut R) -> Result<Option<u8>, DecodeError> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Consume bytes until two consecutive sync bytes have been read
///
/// On success the reader is positioned on the first payload byte. A sync byte
/// followed by anything else restarts the search, clearing the checksum
/// accumulator along with the pending marker.
///
/// Read failures are propagated as [`DecodeError::Io`] without retrying.
pub fn scan_for_header<R: Read>(reader: &mut R) -> Result<Scan, DecodeError> {
    let mut pending = false;
    let mut seed: u32 = 0;
    let mut consumed = 0usize;

    while let Some(byte) = read_byte(reader)? {
        consumed += 1;

        if byte != SYNC_BYTE {
            pending = false;
            seed = 0;
            continue;
        }

        seed += u32::from(byte);
        if pending {
            return Ok(Scan::Aligned(Alignment {
                seed,
                skipped: consumed - MARKER_LEN,
            }));
        }
        pending = true;
    }

    Ok(Scan::EndOfStream {
        consumed,
        pending: usize::from(pending),
    })
}

/// A frame found at a specific offset in a captured buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFrame {
    /// Byte offset of the first marker byte
    pub offset: usize,

    /// The decoded frame
    pub frame: Frame,
}

/// Scan a captured byte buffer for valid frames
///
/// Runs the same resynchronizing decoder used on live streams, so noise,
/// corrupted frames and a truncated tail are all skipped.
pub fn scan_stream(data: &[u8]) -> Vec<LocatedFrame> {
    scan_stream_with_stats(data).0
}

/// Scan a captured byte buffer and report decoder statistics
pub fn scan_stream_with_stats(data: &[u8]) -> (Vec<LocatedFrame>, DecodeStats) {
    let mut decoder = FrameDecoder::new(data);
    let mut results = Vec::new();

    #[cfg(feature = "logging")]
    debug!("Starting buffer scan of {} bytes", data.len());

    loop {
        match decoder.next_frame() {
            Ok(Some(frame)) => {
                let offset = decoder.stats().bytes_read - FRAME_LEN;
                results.push(LocatedFrame { offset, frame });
            }
            Ok(None) => break,
            Err(_e) => {
                // A slice never fails to read; this is a truncated tail.
                #[cfg(feature = "logging")]
                warn!("Buffer scan stopped: {}", _e);
                break;
            }
        }
    }

    let stats = decoder.stats().clone();

    #[cfg(feature = "logging")]
    debug!(
        "Scan complete: found {} valid frames out of {} bytes scanned",
        results.len(),
        stats.bytes_read
    );

    (results, stats)
}
