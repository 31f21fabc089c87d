use anyhow::{Context, Result};
use bytes::{BufMut, BytesMut};
use serde::Deserialize;
use std::fs;
use tfmini_core::constants::{FRAME_LEN, SYNC_BYTE};
use tfmini_core::encoder::FrameBuilder;
use tracing::info;

/// One entry of the input JSON array
#[derive(Debug, Deserialize)]
pub struct SynthReading {
    pub distance: u16,
    #[serde(default)]
    pub strength: u16,
    #[serde(default)]
    pub integration_time: u8,
}

/// Deterministic noise that never contains the sync byte
fn noise(len: usize, seed: usize) -> impl Iterator<Item = u8> {
    (0..len).map(move |i| {
        let b = ((seed * 31 + i * 17) % 251) as u8;
        if b == SYNC_BYTE {
            b.wrapping_add(1)
        } else {
            b
        }
    })
}

/// Write a capture and return the number of frames written
pub fn execute(
    input: &str,
    output: &str,
    garbage: usize,
    corrupt_every: Option<usize>,
) -> Result<usize> {
    info!("Synthesizing capture from {} to {}", input, output);

    // Read input JSON
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    let readings: Vec<SynthReading> =
        serde_json::from_str(&content).with_context(|| "Failed to parse JSON input")?;

    info!("Found {} readings to encode", readings.len());

    let mut output_data = BytesMut::with_capacity(readings.len() * (FRAME_LEN + garbage));
    let mut corrupted = 0;

    for (i, reading) in readings.iter().enumerate() {
        output_data.extend(noise(garbage, i));

        let mut builder = FrameBuilder::new(reading.distance)
            .strength(reading.strength)
            .integration_time(reading.integration_time);

        if corrupt_every.is_some_and(|n| n > 0 && (i + 1) % n == 0) {
            builder = builder.corrupt_checksum();
            corrupted += 1;
        }

        output_data.put_slice(&builder.build());
    }

    // Write output file
    fs::write(output, &output_data)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    info!(
        "Wrote {} frames ({} corrupted, {} bytes total)",
        readings.len(),
        corrupted,
        output_data.len()
    );

    Ok(readings.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_never_contains_sync_byte() {
        for seed in 0..64 {
            assert!(noise(512, seed).all(|b| b != SYNC_BYTE));
        }
    }
}
