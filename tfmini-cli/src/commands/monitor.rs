use anyhow::{Context, Result};
use std::io::{self, BufReader, Write};
use std::time::Duration;
use tfmini_core::heartbeat::{Heartbeat, DEFAULT_TICKS_PER_TOGGLE};
use tfmini_core::sensor::{DistanceSink, LoopSummary, Reading, SensorConfig, SensorLoop, SinkError};
use tfmini_core::FrameDecoder;
use tracing::{debug, info};

use super::{open_source, PortSettings};
use crate::OutputFormat;

/// Publishes readings as lines on a writer
pub struct WriterSink<W> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DistanceSink for WriterSink<W> {
    fn publish(&mut self, reading: &Reading) -> Result<(), SinkError> {
        let line = match self.format {
            OutputFormat::Text => format!(
                "TFmini sent: {} (strength {}, seq {})",
                reading.distance, reading.strength, reading.sequence
            ),
            OutputFormat::Jsonl => {
                serde_json::to_string(reading).map_err(|e| SinkError(e.to_string()))?
            }
        };

        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| SinkError(e.to_string()))
    }
}

pub fn execute(
    device: &str,
    port: &PortSettings,
    max_distance: u16,
    count: Option<u64>,
    interval_ms: u64,
    format: OutputFormat,
) -> Result<LoopSummary> {
    let config = SensorConfig {
        max_distance,
        max_readings: count,
        interval: Duration::from_millis(interval_ms),
    };

    let stdout = io::stdout();
    let mut sink = WriterSink::new(stdout.lock(), format);

    run(device, port, config, &mut sink)
}

/// Run the sensor loop from `device` into `sink`
pub fn run<S: DistanceSink>(
    device: &str,
    port: &PortSettings,
    config: SensorConfig,
    sink: &mut S,
) -> Result<LoopSummary> {
    let sensor = SensorLoop::new(config);
    info!(
        "Starting distance monitor on {} (publishing below {})",
        device,
        sensor.config().max_distance
    );

    let source = open_source(device, port)?;
    let mut decoder = FrameDecoder::new(BufReader::new(source));
    let mut heartbeat = Heartbeat::new(DEFAULT_TICKS_PER_TOGGLE, |lit| {
        debug!("Heartbeat {}", if lit { "on" } else { "off" });
    });

    let summary = sensor
        .run(&mut decoder, sink, &mut heartbeat)
        .with_context(|| format!("Sensor loop on {} failed", device))?;

    info!(
        "Monitor finished: {} published, {} out of range, {} truncated, {} resyncs",
        summary.published, summary.dropped_out_of_range, summary.truncations, summary.resyncs
    );

    Ok(summary)
}
