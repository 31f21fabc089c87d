use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tfmini_cli::commands::{self, PortSettings};
use tfmini_cli::OutputFormat;
use tfmini_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_DEVICE, MAX_VALID_DISTANCE};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "tfmini")]
#[command(about = "TFmini - Frame decoder for time-of-flight distance sensors", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every frame in a capture or device
    Decode {
        /// Input file or device ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output JSON file for decoded frames
        #[arg(short, long)]
        output: Option<String>,

        /// Include the raw frame bytes as hex
        #[arg(long)]
        hex: bool,

        /// Baud rate when the input is a serial device
        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,
    },

    /// Scan a capture and report recovery statistics
    Scan {
        /// Input file to scan
        #[arg(short, long)]
        input: String,

        /// Output JSON file for located frames
        #[arg(short, long)]
        output: Option<String>,

        /// Show statistics only
        #[arg(long)]
        stats_only: bool,
    },

    /// Write a synthetic capture from a JSON array of readings
    Synth {
        /// Input JSON file (array of readings)
        #[arg(short, long)]
        input: String,

        /// Output file for the capture
        #[arg(short, long)]
        output: String,

        /// Noise bytes inserted before every frame
        #[arg(long, default_value = "0")]
        garbage: usize,

        /// Corrupt the checksum of every Nth frame
        #[arg(long)]
        corrupt_every: Option<usize>,
    },

    /// Run the sensor loop and print in-range distances
    Monitor {
        /// Serial device or capture file ("-" for stdin)
        #[arg(short, long, default_value = DEFAULT_DEVICE)]
        device: String,

        /// Serial baud rate
        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,

        /// Give up when the device is silent for this long (milliseconds)
        #[arg(long, default_value = "1000")]
        timeout_ms: u64,

        /// Distances at or above this value are dropped
        #[arg(long, default_value_t = MAX_VALID_DISTANCE)]
        max_distance: u16,

        /// Stop after this many frames
        #[arg(long)]
        count: Option<u64>,

        /// Pause between readings in milliseconds
        #[arg(long, default_value = "100")]
        interval_ms: u64,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Decode {
            input,
            output,
            hex,
            baud,
        } => {
            let port = PortSettings {
                baud_rate: baud,
                ..Default::default()
            };
            commands::decode::execute(&input, output.as_deref(), hex, &port)
        }

        Commands::Scan {
            input,
            output,
            stats_only,
        } => commands::scan::execute(&input, output.as_deref(), stats_only),

        Commands::Synth {
            input,
            output,
            garbage,
            corrupt_every,
        } => commands::synth::execute(&input, &output, garbage, corrupt_every).map(|_| ()),

        Commands::Monitor {
            device,
            baud,
            timeout_ms,
            max_distance,
            count,
            interval_ms,
            format,
        } => {
            let port = PortSettings {
                baud_rate: baud,
                timeout: Duration::from_millis(timeout_ms),
            };
            commands::monitor::execute(&device, &port, max_distance, count, interval_ms, format)
                .map(|_| ())
        }
    }
}
