//! Error types for TFmini frame operations

/// Errors surfaced while decoding frames from a byte stream
///
/// Checksum mismatches never appear here: the decoder resynchronizes on them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The underlying device or file failed to read
    #[error("IO error: {0}")]
    Io(String),

    /// The stream ended before a full frame was assembled
    #[error("Truncated frame: expected {expected} bytes, got {actual}")]
    Truncated {
        /// The number of bytes expected.
        expected: usize,
        /// The number of bytes actually read.
        actual: usize,
    },
}

impl DecodeError {
    /// Whether the error ends the decode session
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecodeError::Io(_))
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::Io(err.to_string())
    }
}

/// Errors from strictly parsing a standalone frame buffer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Buffer is not exactly one frame long
    #[error("Incomplete frame: expected {expected} bytes, got {actual}")]
    IncompleteFrame {
        /// The number of bytes expected.
        expected: usize,
        /// The number of bytes actually found.
        actual: usize,
    },

    /// Marker bytes do not match the sync value
    #[error("Invalid frame marker: expected 5959, got {0:02x?}")]
    BadMarker([u8; 2]),

    /// Checksum mismatch
    #[error("Checksum mismatch: expected {expected:02x}, got {actual:02x}")]
    ChecksumMismatch {
        /// The checksum carried by the frame.
        expected: u8,
        /// The checksum calculated over the frame.
        actual: u8,
    },
}
