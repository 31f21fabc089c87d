//! Subcommand implementations

pub mod decode;
pub mod monitor;
pub mod scan;
pub mod synth;

use anyhow::{Context, Result};
use serialport::{DataBits, FlowControl, Parity, StopBits};
use std::fs::{self, File};
use std::io::{self, Read};
use std::time::Duration;
use tfmini_core::constants::DEFAULT_BAUD_RATE;
use tracing::debug;

/// Line settings applied when the input is a serial device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSettings {
    pub baud_rate: u32,
    /// A read that waits longer than this fails the stream
    pub timeout: Duration,
}

impl Default for PortSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_millis(1000),
        }
    }
}

/// Whether `path` names a serial device rather than a capture file
pub fn is_serial_device(path: &str) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        fs::metadata(path)
            .map(|m| m.file_type().is_char_device())
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        // COM ports are not regular files
        !fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }
}

/// Open a capture file, serial device, or `-` for stdin
///
/// Serial devices are put in raw 8N1 mode so that no byte of a frame is
/// rewritten or held back by the terminal line discipline.
pub(crate) fn open_source(path: &str, port: &PortSettings) -> Result<Box<dyn Read>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }

    if is_serial_device(path) {
        debug!("Opening serial device {} at {} baud", path, port.baud_rate);
        let serial = serialport::new(path, port.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(port.timeout)
            .open_native()
            .with_context(|| format!("Failed to open serial device: {}", path))?;
        return Ok(Box::new(serial));
    }

    let file = File::open(path).with_context(|| format!("Failed to open input: {}", path))?;
    Ok(Box::new(file))
}
