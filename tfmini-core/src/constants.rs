//! Constants for the TFmini serial frame format

/// Marker byte, sent twice at the start of every frame
pub const SYNC_BYTE: u8 = 0x59;

/// Number of marker bytes at the start of a frame
pub const MARKER_LEN: usize = 2;

/// Expected value of the spare byte
pub const SPARE_BYTE: u8 = 0x00;

/// Total size of a frame on the wire
/// 2 (marker) + 2 (distance) + 2 (strength) + 1 (integration time) + 1 (spare) + 1 (checksum) = 9 bytes
pub const FRAME_LEN: usize = 9;

/// Bytes that follow the marker: six payload bytes plus the checksum
pub const PAYLOAD_LEN: usize = FRAME_LEN - MARKER_LEN;

/// Offset of the checksum byte; the checksum covers every byte before it
pub const CHECKSUM_OFFSET: usize = FRAME_LEN - 1;

/// Checksum accumulator value after both marker bytes have been seen
pub const SYNC_SEED: u32 = 2 * SYNC_BYTE as u32;

/// Readings at or above this distance are treated as out of range by the sensor loop
pub const MAX_VALID_DISTANCE: u16 = 12_000;

/// Serial device the sensor is attached to on the reference board
pub const DEFAULT_DEVICE: &str = "/dev/ttyS1";

/// Factory baud rate of the sensor's UART (8N1)
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Field offsets within a frame
pub mod offset {
    /// Distance, low byte
    pub const DISTANCE_LOW: usize = 2;
    /// Distance, high byte
    pub const DISTANCE_HIGH: usize = 3;
    /// Signal strength, low byte
    pub const STRENGTH_LOW: usize = 4;
    /// Signal strength, high byte
    pub const STRENGTH_HIGH: usize = 5;
    /// Integration time
    pub const INTEGRATION_TIME: usize = 6;
    /// Spare byte
    pub const SPARE: usize = 7;
    /// Checksum
    pub const CHECKSUM: usize = super::CHECKSUM_OFFSET;
}
