//! Sensor loop: turns decoded frames into published distance readings

use crate::constants::MAX_VALID_DISTANCE;
use crate::decoder::FrameDecoder;
use crate::error::DecodeError;
use crate::heartbeat::Heartbeat;
use crate::types::Frame;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::thread;
use std::time::Duration;

#[cfg(feature = "logging")]
use tracing::{debug, info, warn};

/// A distance sample ready for publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Count of frames decoded so far, including this one
    pub sequence: u64,

    /// Distance, `(high << 8) | low`
    pub distance: u16,

    /// Signal strength
    pub strength: u16,

    /// Integration time byte
    pub integration_time: u8,
}

impl Reading {
    /// Convert a decoded frame into a reading
    pub fn from_frame(frame: &Frame, sequence: u64) -> Self {
        Self {
            sequence,
            distance: frame.distance(),
            strength: frame.strength(),
            integration_time: frame.integration_time(),
        }
    }
}

/// A publishing sink refused a reading
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Sink rejected reading: {0}")]
pub struct SinkError(pub String);

/// Errors that stop the sensor loop
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    /// The byte stream failed
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The publishing sink failed
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Destination for in-range readings (a message bus publisher, stdout, ...)
pub trait DistanceSink {
    /// Publish one reading
    fn publish(&mut self, reading: &Reading) -> Result<(), SinkError>;
}

impl DistanceSink for Vec<Reading> {
    fn publish(&mut self, reading: &Reading) -> Result<(), SinkError> {
        self.push(*reading);
        Ok(())
    }
}

/// Sensor loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Readings at or above this distance are dropped
    pub max_distance: u16,

    /// Stop after this many decoded frames
    pub max_readings: Option<u64>,

    /// Pause between publish cycles
    pub interval: Duration,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            max_distance: MAX_VALID_DISTANCE,
            max_readings: None,
            interval: Duration::from_millis(100),
        }
    }
}

/// What a finished sensor loop did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopSummary {
    /// Frames decoded
    pub decoded: u64,

    /// Readings handed to the sink
    pub published: u64,

    /// Readings dropped for being out of range
    pub dropped_out_of_range: u64,

    /// Truncated frames that were retried
    pub truncations: u64,

    /// Checksum-driven resynchronizations seen by the decoder
    pub resyncs: usize,
}

/// Repeatedly decodes frames and forwards in-range distances to a sink
#[derive(Debug, Clone, Default)]
pub struct SensorLoop {
    config: SensorConfig,
}

impl SensorLoop {
    /// Create a sensor loop
    pub fn new(config: SensorConfig) -> Self {
        Self { config }
    }

    /// Loop settings
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Whether a distance is plausible enough to publish
    pub fn is_in_range(&self, distance: u16) -> bool {
        distance < self.config.max_distance
    }

    /// Run until the stream ends, the reading budget is spent, or an error stops it
    ///
    /// Truncated frames are logged and retried. Read failures and sink
    /// failures end the loop with an error.
    pub fn run<R, S, F>(
        &self,
        decoder: &mut FrameDecoder<R>,
        sink: &mut S,
        heartbeat: &mut Heartbeat<F>,
    ) -> Result<LoopSummary, SensorError>
    where
        R: Read,
        S: DistanceSink,
        F: FnMut(bool),
    {
        let mut summary = LoopSummary::default();

        while self
            .config
            .max_readings
            .map_or(true, |max| summary.decoded < max)
        {
            let frame = match decoder.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    #[cfg(feature = "logging")]
                    info!("Sensor stream closed after {} frames", summary.decoded);
                    break;
                }
                Err(_e @ DecodeError::Truncated { .. }) => {
                    summary.truncations += 1;

                    #[cfg(feature = "logging")]
                    warn!("{}, retrying", _e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            summary.decoded += 1;
            let reading = Reading::from_frame(&frame, summary.decoded);

            if self.is_in_range(reading.distance) {
                sink.publish(&reading)?;
                summary.published += 1;
            } else {
                summary.dropped_out_of_range += 1;

                #[cfg(feature = "logging")]
                debug!(
                    "Dropping out-of-range distance {} (limit {})",
                    reading.distance, self.config.max_distance
                );
            }

            heartbeat.tick();

            if !self.config.interval.is_zero() {
                thread::sleep(self.config.interval);
            }
        }

        summary.resyncs = decoder.stats().resyncs;
        Ok(summary)
    }
}
