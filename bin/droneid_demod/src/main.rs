use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use droneid_core::PipelineConfig;
use droneid_dsp::Complex32;
use droneid_pipeline::{FileSampleSource, PipelineOrchestrator};
use num::Complex;
use tracing_subscriber::EnvFilter;

/// DJI DroneID OFDM signal-to-bytes demodulator: reads a recorded
/// complex-baseband capture and emits decoded payload bytes.
#[derive(Parser, Debug)]
#[command(name = "droneid_demod", version, about)]
struct Cli {
    /// Path to a packed little-endian float32 I/Q capture file.
    #[arg(short, long)]
    input: PathBuf,

    /// Optional TOML config file; CLI flags override values it sets.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Packet type to demodulate: droneid, droneid-legacy, c2, beacon,
    /// pairing, video.
    #[arg(short = 'p', long)]
    packet_type: Option<String>,

    /// Sample rate of the input capture, in Hz.
    #[arg(short = 's', long)]
    sample_rate: Option<f64>,

    /// Number of worker threads decoding candidates concurrently.
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Treat the entire input as one candidate window, skipping packetizing.
    #[arg(long)]
    skip_detection: bool,

    /// Append every structurally-decoded frame's raw bytes to this file.
    #[arg(long)]
    bits_log: Option<PathBuf>,

    /// Enable verbose debug output (equivalent to RUST_LOG=debug).
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(packet_type) = cli.packet_type {
        config.packet_type = packet_type;
    }
    if let Some(rate) = cli.sample_rate {
        config.sample_rate_hz = rate;
    }
    if let Some(workers) = cli.workers {
        config.worker_count = workers;
    }
    if cli.skip_detection {
        config.skip_detection = true;
    }
    if cli.debug {
        config.debug = true;
    }
    if let Some(path) = cli.bits_log {
        config.bits_log_path = Some(path.to_string_lossy().to_string());
    }

    let samples = read_iq_file(&cli.input)
        .with_context(|| format!("reading capture file {:?}", cli.input))?;
    tracing::info!(samples = samples.len(), sample_rate_hz = config.sample_rate_hz, "loaded capture");

    let source = FileSampleSource::new(samples, config.sample_rate_hz);
    let orchestrator = PipelineOrchestrator::new(config)?;
    let snapshot = orchestrator.run(source)?;

    println!(
        "candidates={} decoded={} crc_ok={} crc_err={}",
        snapshot.candidates, snapshot.decoded, snapshot.crc_ok, snapshot.crc_err
    );
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<PipelineConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading config {path:?}"))?;
    toml::from_str(&text).with_context(|| format!("parsing config {path:?}"))
}

/// Reads packed little-endian float32 (real, imag) pairs with no header, per
/// the offline input format.
fn read_iq_file(path: &PathBuf) -> Result<Vec<Complex32>> {
    let bytes = fs::read(path)?;
    let mut samples = Vec::with_capacity(bytes.len() / 8);
    for chunk in bytes.chunks_exact(8) {
        let re = f32::from_le_bytes(chunk[0..4].try_into().unwrap());
        let im = f32::from_le_bytes(chunk[4..8].try_into().unwrap());
        samples.push(Complex::new(re, im));
    }
    Ok(samples)
}
