//! # TFmini Core
//!
//! Framing and resynchronization decoder for TFmini-style pulsed
//! time-of-flight distance sensors streaming 9-byte frames over a serial link.
//!
//! ## Modules
//!
//! - `constants`: Frame format constants and limits
//! - `types`: The `Frame` value and checksum helper
//! - `error`: Decode and strict-parse errors
//! - `scanner`: Marker pair scanning and buffer scanning
//! - `decoder`: Payload reading, validation and resynchronization
//! - `encoder`: Frame encoding for captures and tests
//! - `sensor`: Sensor loop forwarding in-range distances to a sink
//! - `heartbeat`: Tick-driven heartbeat indicator

#![warn(missing_docs)]

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod heartbeat;
pub mod scanner;
pub mod sensor;
pub mod types;

// Re-export commonly used types
pub use decoder::{decode_next_frame, DecodeStats, FrameDecoder};
pub use error::{DecodeError, FrameError};
pub use types::Frame;
