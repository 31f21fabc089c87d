//! Core types for TFmini frames

use crate::constants::{offset, CHECKSUM_OFFSET, FRAME_LEN, MARKER_LEN, SPARE_BYTE, SYNC_BYTE};
use crate::error::FrameError;

/// Sum the bytes of `data` into an 8-bit additive checksum
pub fn compute_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// One decoded sensor sample, exactly as it appeared on the wire
///
/// A `Frame` only exists once its marker and checksum have been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    bytes: [u8; FRAME_LEN],
}

impl Frame {
    /// Build a frame from raw wire bytes without validating them
    pub(crate) const fn from_raw(bytes: [u8; FRAME_LEN]) -> Self {
        Self { bytes }
    }

    /// Parse exactly one frame from `data`
    ///
    /// Strict: the buffer must be 9 bytes, start with two sync bytes and
    /// carry a matching checksum.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FrameError> {
        let bytes: [u8; FRAME_LEN] = data.try_into().map_err(|_| FrameError::IncompleteFrame {
            expected: FRAME_LEN,
            actual: data.len(),
        })?;

        if bytes[..MARKER_LEN] != [SYNC_BYTE; MARKER_LEN] {
            return Err(FrameError::BadMarker([bytes[0], bytes[1]]));
        }

        let frame = Self::from_raw(bytes);
        let actual = frame.compute_checksum();
        if actual != frame.checksum() {
            return Err(FrameError::ChecksumMismatch {
                expected: frame.checksum(),
                actual,
            });
        }

        Ok(frame)
    }

    /// Raw wire bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// The two marker bytes
    pub fn markers(&self) -> [u8; MARKER_LEN] {
        [self.bytes[0], self.bytes[1]]
    }

    /// Distance, low byte
    pub fn distance_low(&self) -> u8 {
        self.bytes[offset::DISTANCE_LOW]
    }

    /// Distance, high byte
    pub fn distance_high(&self) -> u8 {
        self.bytes[offset::DISTANCE_HIGH]
    }

    /// Distance reading, `(high << 8) | low`
    pub fn distance(&self) -> u16 {
        u16::from_le_bytes([self.distance_low(), self.distance_high()])
    }

    /// Signal strength, `(high << 8) | low`
    pub fn strength(&self) -> u16 {
        u16::from_le_bytes([
            self.bytes[offset::STRENGTH_LOW],
            self.bytes[offset::STRENGTH_HIGH],
        ])
    }

    /// Integration time byte
    pub fn integration_time(&self) -> u8 {
        self.bytes[offset::INTEGRATION_TIME]
    }

    /// Spare byte
    pub fn spare(&self) -> u8 {
        self.bytes[offset::SPARE]
    }

    /// Whether the spare byte holds its documented value
    pub fn has_expected_spare(&self) -> bool {
        self.spare() == SPARE_BYTE
    }

    /// Checksum byte carried by the frame
    pub fn checksum(&self) -> u8 {
        self.bytes[offset::CHECKSUM]
    }

    /// Checksum recomputed over the 8 bytes preceding the checksum field
    pub fn compute_checksum(&self) -> u8 {
        compute_checksum(&self.bytes[..CHECKSUM_OFFSET])
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
