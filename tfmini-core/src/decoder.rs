//! Frame decoding with automatic resynchronization
//!
//! Decoding one frame runs a small state machine:
//!
//! ```text
//! SCANNING -> ALIGNED -> PAYLOAD_READ -> VALID
//!    ^                        |
//!    +------- INVALID --------+
//! ```
//!
//! A checksum mismatch is treated as line noise: the decoder goes back to
//! scanning for the next marker pair instead of reporting it.

use crate::constants::{FRAME_LEN, MARKER_LEN, PAYLOAD_LEN, SYNC_BYTE};
use crate::error::DecodeError;
use crate::scanner::{scan_for_header, Alignment, Scan};
use crate::types::Frame;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Counters kept by a [`FrameDecoder`] over its lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Total bytes pulled from the reader
    pub bytes_read: usize,

    /// Number of valid frames returned
    pub frames_decoded: usize,

    /// Candidate frames rejected by the checksum
    pub resyncs: usize,

    /// Frames cut short by the end of the stream
    pub truncations: usize,

    /// Bytes read that did not end up in a returned frame
    pub bytes_discarded: usize,
}

impl DecodeStats {
    /// Share of bytes read that belonged to valid frames, as a percentage
    pub fn recovery_rate(&self) -> f64 {
        if self.bytes_read == 0 {
            0.0
        } else {
            ((self.frames_decoded * FRAME_LEN) as f64 / self.bytes_read as f64) * 100.0
        }
    }
}

/// Read the 7 bytes that follow the marker pair
///
/// Short reads are accumulated until the buffer is full. If the reader hits
/// end of stream first, the frame is reported as truncated rather than
/// returned with indeterminate bytes.
pub fn read_payload<R: Read>(
    reader: &mut R,
    buf: &mut [u8; PAYLOAD_LEN],
) -> Result<(), DecodeError> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(DecodeError::Truncated {
                    expected: FRAME_LEN,
                    actual: MARKER_LEN + filled,
                });
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Check a candidate frame against the checksum seeded by the scanner
///
/// The checksum covers the 8 bytes before the checksum field: both marker
/// bytes (already in `seed`) and the six payload bytes.
fn validate(alignment: &Alignment, payload: &[u8; PAYLOAD_LEN]) -> Result<Frame, (u8, u8)> {
    let (body, checksum) = payload.split_at(PAYLOAD_LEN - 1);
    let total = body
        .iter()
        .fold(alignment.seed, |acc, b| acc + u32::from(*b));
    let actual = (total & 0xFF) as u8;

    if actual != checksum[0] {
        return Err((checksum[0], actual));
    }

    let mut bytes = [SYNC_BYTE; FRAME_LEN];
    bytes[MARKER_LEN..].copy_from_slice(payload);
    Ok(Frame::from_raw(bytes))
}

/// Result of one pass through the state machine
enum Outcome {
    Frame(Frame),
    EndOfStream { pending: usize },
}

/// Decode the next valid frame, resynchronizing over corrupted ones
///
/// Iterative on purpose: a long run of bad frames must not grow the stack.
fn decode_one<R: Read>(reader: &mut R, stats: &mut DecodeStats) -> Result<Outcome, DecodeError> {
    loop {
        let alignment = match scan_for_header(reader)? {
            Scan::Aligned(alignment) => alignment,
            Scan::EndOfStream { consumed, pending } => {
                stats.bytes_read += consumed;
                stats.bytes_discarded += consumed;
                return Ok(Outcome::EndOfStream { pending });
            }
        };

        stats.bytes_read += alignment.skipped + MARKER_LEN;
        stats.bytes_discarded += alignment.skipped;

        if alignment.skipped > 0 {
            #[cfg(feature = "logging")]
            debug!("Skipped {} bytes before frame marker", alignment.skipped);
        }

        let mut payload = [0u8; PAYLOAD_LEN];
        if let Err(e) = read_payload(reader, &mut payload) {
            if let DecodeError::Truncated { actual, .. } = &e {
                let actual = *actual;
                stats.bytes_read += actual - MARKER_LEN;
                stats.bytes_discarded += actual;
                stats.truncations += 1;

                #[cfg(feature = "logging")]
                debug!("Stream ended mid-frame after {} bytes", actual);
            }
            return Err(e);
        }
        stats.bytes_read += PAYLOAD_LEN;

        match validate(&alignment, &payload) {
            Ok(frame) => {
                stats.frames_decoded += 1;
                return Ok(Outcome::Frame(frame));
            }
            Err((_expected, _actual)) => {
                stats.resyncs += 1;
                stats.bytes_discarded += FRAME_LEN;

                #[cfg(feature = "logging")]
                warn!(
                    "Checksum mismatch (frame says {:02x}, computed {:02x}), resynchronizing",
                    _expected, _actual
                );
            }
        }
    }
}

/// Decode the next frame from `reader`
///
/// Checksum failures are never returned; the decoder rescans instead. If the
/// stream ends before a frame is complete (including while still looking for
/// the marker) the result is [`DecodeError::Truncated`].
pub fn decode_next_frame<R: Read>(reader: &mut R) -> Result<Frame, DecodeError> {
    let mut stats = DecodeStats::default();
    match decode_one(reader, &mut stats)? {
        Outcome::Frame(frame) => Ok(frame),
        Outcome::EndOfStream { pending } => Err(DecodeError::Truncated {
            expected: FRAME_LEN,
            actual: pending,
        }),
    }
}

/// Lazy, restartable sequence of validated frames over an owned reader
///
/// The decoder assumes exclusive use of the reader for its lifetime. Each
/// call starts a fresh scan, so a caller may stop between frames and resume
/// later.
#[derive(Debug)]
pub struct FrameDecoder<R> {
    reader: R,
    stats: DecodeStats,
}

impl<R: Read> FrameDecoder<R> {
    /// Create a decoder that takes ownership of `reader`
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            stats: DecodeStats::default(),
        }
    }

    /// Decode the next valid frame
    ///
    /// Returns `Ok(None)` when the stream ends cleanly between frames.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, DecodeError> {
        match decode_one(&mut self.reader, &mut self.stats)? {
            Outcome::Frame(frame) => Ok(Some(frame)),
            Outcome::EndOfStream { .. } => Ok(None),
        }
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }
}

impl<R: Read> Iterator for FrameDecoder<R> {
    type Item = Result<Frame, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
