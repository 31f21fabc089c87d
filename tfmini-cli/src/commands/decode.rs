use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::BufReader;
use tfmini_core::{DecodeError, FrameDecoder};
use tracing::{info, warn};

use super::{open_source, PortSettings};

#[derive(Debug, Serialize, Deserialize)]
pub struct DecodedFrame {
    pub index: usize,
    pub distance: u16,
    pub strength: u16,
    pub integration_time: u8,
    pub spare: u8,
    pub checksum: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

pub fn execute(
    input: &str,
    output: Option<&str>,
    show_hex: bool,
    port: &PortSettings,
) -> Result<()> {
    info!("Decoding frames from: {}", input);

    let source = open_source(input, port)?;
    let mut decoder = FrameDecoder::new(BufReader::new(source));
    let mut frames = Vec::new();

    loop {
        match decoder.next_frame() {
            Ok(Some(frame)) => {
                if !frame.has_expected_spare() {
                    warn!(
                        "Frame {} has unexpected spare byte {:02x}",
                        frames.len(),
                        frame.spare()
                    );
                }
                frames.push(DecodedFrame {
                    index: frames.len(),
                    distance: frame.distance(),
                    strength: frame.strength(),
                    integration_time: frame.integration_time(),
                    spare: frame.spare(),
                    checksum: frame.checksum(),
                    raw: show_hex.then(|| hex::encode(frame.as_bytes())),
                });
            }
            Ok(None) => break,
            Err(e @ DecodeError::Truncated { .. }) => {
                warn!("{}", e);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read from {}", input));
            }
        }
    }

    let stats = decoder.stats();
    info!(
        "Decoded {} frames ({} resyncs, {} bytes discarded)",
        stats.frames_decoded, stats.resyncs, stats.bytes_discarded
    );

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&frames)
            .with_context(|| "Failed to serialize decoded frames")?;

        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Decoded frames written to: {}", output_path);
    } else {
        for frame in &frames {
            match &frame.raw {
                Some(raw) => println!(
                    "#{:<6} distance={:<5} strength={:<5} itime={} [{}]",
                    frame.index, frame.distance, frame.strength, frame.integration_time, raw
                ),
                None => println!(
                    "#{:<6} distance={:<5} strength={:<5} itime={}",
                    frame.index, frame.distance, frame.strength, frame.integration_time
                ),
            }
        }
    }

    Ok(())
}
