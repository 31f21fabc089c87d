use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use tfmini_core::scanner::scan_stream_with_stats;
use tracing::info;

#[derive(Serialize, Deserialize)]
struct RecoveredFrame {
    offset: usize,
    distance: u16,
    strength: u16,
    integration_time: u8,
}

pub fn execute(input: &str, output: Option<&str>, stats_only: bool) -> Result<()> {
    info!("Scanning file: {}", input);

    // Read input file
    let data = fs::read(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    info!("File size: {} bytes", data.len());

    // Scan the capture
    let (located_frames, stats) = scan_stream_with_stats(&data);

    // Print statistics
    println!("\n=== Scan Results ===");
    println!("Bytes scanned:     {} bytes", stats.bytes_read);
    println!("Valid frames:      {}", stats.frames_decoded);
    println!("Checksum resyncs:  {}", stats.resyncs);
    println!("Truncated frames:  {}", stats.truncations);
    println!("Bytes discarded:   {} bytes", stats.bytes_discarded);
    println!("Recovery rate:     {:.2}%", stats.recovery_rate());

    if stats.frames_decoded == 0 {
        println!("{} No valid frames found", "✗".red());
    } else if stats.resyncs == 0 && stats.bytes_discarded == 0 {
        println!("{} Capture is clean", "✓".green());
    } else {
        println!("{} Capture contains noise or corrupted frames", "!".yellow());
    }
    println!();

    if stats_only {
        return Ok(());
    }

    // Convert to JSON-friendly format
    let recovered: Vec<RecoveredFrame> = located_frames
        .iter()
        .map(|lf| RecoveredFrame {
            offset: lf.offset,
            distance: lf.frame.distance(),
            strength: lf.frame.strength(),
            integration_time: lf.frame.integration_time(),
        })
        .collect();

    if let Some(output_path) = output {
        // Write to JSON file
        let json = serde_json::to_string_pretty(&recovered)
            .with_context(|| "Failed to serialize recovered frames")?;

        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Recovered frames written to: {}", output_path);
    } else {
        // Print to stdout
        println!("=== Recovered Frames ===");
        for frame in &recovered {
            println!(
                "Frame @ offset {}: distance {} (strength {})",
                frame.offset, frame.distance, frame.strength
            );
        }
    }

    Ok(())
}
