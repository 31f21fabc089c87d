use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

use tfmini_cli::commands::monitor::{self, WriterSink};
use tfmini_cli::commands::PortSettings;
use tfmini_cli::OutputFormat;
use tfmini_core::encoder::{encode_frame, FrameBuilder};
use tfmini_core::sensor::{DistanceSink, LoopSummary, Reading, SensorConfig};

fn config(count: Option<u64>) -> SensorConfig {
    SensorConfig {
        max_readings: count,
        interval: Duration::ZERO,
        ..Default::default()
    }
}

fn run_capture<S: DistanceSink>(
    device: &Path,
    count: Option<u64>,
    sink: &mut S,
) -> anyhow::Result<LoopSummary> {
    monitor::run(
        device.to_str().unwrap(),
        &PortSettings::default(),
        config(count),
        sink,
    )
}

#[test]
fn test_monitor_publishes_in_range_readings() {
    let td = tempdir().unwrap();
    let device = td.path().join("ttyS1.bin");

    let mut data = encode_frame(300, 900, 2).to_vec();
    data.extend_from_slice(&encode_frame(65_000, 3, 2));
    data.extend_from_slice(&FrameBuilder::new(1).corrupt_checksum().build());
    data.extend_from_slice(&encode_frame(310, 880, 2));
    fs::write(&device, data).unwrap();

    let mut sink: Vec<Reading> = Vec::new();
    let summary = run_capture(&device, None, &mut sink).unwrap();

    assert_eq!(summary.decoded, 3);
    assert_eq!(summary.published, 2);
    assert_eq!(summary.dropped_out_of_range, 1);
    assert_eq!(summary.resyncs, 1);
    assert_eq!(sink[1].distance, 310);
    assert_eq!(sink[1].sequence, 3);
}

#[test]
fn test_monitor_jsonl_sink() {
    let td = tempdir().unwrap();
    let device = td.path().join("ttyS1.bin");

    let data: Vec<u8> = (1..=4u16)
        .flat_map(|d| encode_frame(d * 10, 0, 0).to_vec())
        .collect();
    fs::write(&device, data).unwrap();

    let mut sink = WriterSink::new(Vec::new(), OutputFormat::Jsonl);
    let summary = run_capture(&device, Some(2), &mut sink).unwrap();
    assert_eq!(summary.published, 2);

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<Reading> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].distance, 10);
    assert_eq!(lines[1].distance, 20);
}

#[test]
fn test_monitor_text_sink() {
    let td = tempdir().unwrap();
    let device = td.path().join("ttyS1.bin");
    fs::write(&device, encode_frame(2560, 256, 5)).unwrap();

    let mut sink = WriterSink::new(Vec::new(), OutputFormat::Text);
    run_capture(&device, None, &mut sink).unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(output, "TFmini sent: 2560 (strength 256, seq 1)\n");
}

#[test]
fn test_monitor_missing_device() {
    let td = tempdir().unwrap();
    let device = td.path().join("ttyUSB9");

    let mut sink: Vec<Reading> = Vec::new();
    let result = run_capture(&device, None, &mut sink);

    assert!(result.is_err());
}

#[cfg(target_os = "linux")]
#[test]
fn test_monitor_reads_raw_bytes_from_serial_device() {
    use serialport::{SerialPort, TTYPort};
    use std::io::Write;
    use std::thread;

    let (mut master, slave) = TTYPort::pair().unwrap();
    let device = slave.name().unwrap();
    drop(slave);

    // 0x0D checksums would be rewritten by a terminal left in cooked mode
    let frame = [0x59, 0x59, 0x5B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0D];
    let writer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        master.write_all(&frame).unwrap();
        master.write_all(&frame).unwrap();
        master.write_all(b"\n").unwrap();
        master.flush().unwrap();
        master
    });

    let settings = PortSettings {
        timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let mut sink: Vec<Reading> = Vec::new();
    let summary = monitor::run(&device, &settings, config(Some(2)), &mut sink).unwrap();
    let _master = writer.join().unwrap();

    assert_eq!(summary.decoded, 2);
    assert_eq!(summary.resyncs, 0);
    assert_eq!(sink.len(), 2);
    assert!(sink.iter().all(|r| r.distance == 91));
}
