//! Frame encoding
//!
//! The sensor only ever transmits; encoding exists to produce captures for
//! tests, benchmarks and the `synth` command.

use crate::constants::{CHECKSUM_OFFSET, FRAME_LEN, SPARE_BYTE, SYNC_BYTE};
use crate::types::{compute_checksum, Frame};
use bytes::{BufMut, Bytes, BytesMut};

/// Encode a reading into its 9-byte wire form
///
/// Layout:
/// 1. Marker (2 bytes): `0x59 0x59`
/// 2. Distance (2 bytes, little-endian)
/// 3. Strength (2 bytes, little-endian)
/// 4. Integration time (1 byte)
/// 5. Spare (1 byte, `0x00`)
/// 6. Checksum (1 byte): low 8 bits of the sum of the bytes above
pub fn encode_frame(distance: u16, strength: u16, integration_time: u8) -> Bytes {
    FrameBuilder::new(distance)
        .strength(strength)
        .integration_time(integration_time)
        .build()
}

/// Builder for frames with non-default fields or a deliberately bad checksum
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    distance: u16,
    strength: u16,
    integration_time: u8,
    spare: u8,
    checksum_offset: u8,
}

impl FrameBuilder {
    /// Create a new frame builder
    pub fn new(distance: u16) -> Self {
        Self {
            distance,
            strength: 0,
            integration_time: 0,
            spare: SPARE_BYTE,
            checksum_offset: 0,
        }
    }

    /// Set the signal strength
    pub fn strength(mut self, strength: u16) -> Self {
        self.strength = strength;
        self
    }

    /// Set the integration time byte
    pub fn integration_time(mut self, integration_time: u8) -> Self {
        self.integration_time = integration_time;
        self
    }

    /// Override the spare byte
    pub fn spare(mut self, spare: u8) -> Self {
        self.spare = spare;
        self
    }

    /// Emit a checksum that is off by one
    pub fn corrupt_checksum(mut self) -> Self {
        self.checksum_offset = 1;
        self
    }

    fn to_array(&self) -> [u8; FRAME_LEN] {
        let mut buf = BytesMut::with_capacity(FRAME_LEN);
        buf.put_u8(SYNC_BYTE);
        buf.put_u8(SYNC_BYTE);
        buf.put_u16_le(self.distance);
        buf.put_u16_le(self.strength);
        buf.put_u8(self.integration_time);
        buf.put_u8(self.spare);

        let checksum = compute_checksum(&buf[..CHECKSUM_OFFSET]);
        buf.put_u8(checksum.wrapping_add(self.checksum_offset));

        let mut out = [0u8; FRAME_LEN];
        out.copy_from_slice(&buf);
        out
    }

    /// Build and encode the frame
    pub fn build(self) -> Bytes {
        Bytes::copy_from_slice(&self.to_array())
    }

    /// Build the frame struct without encoding
    ///
    /// A builder with a corrupted checksum still yields a `Frame`; it will not
    /// pass [`Frame::from_bytes`].
    pub fn build_struct(self) -> Frame {
        Frame::from_raw(self.to_array())
    }
}
