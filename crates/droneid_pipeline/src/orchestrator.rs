use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use droneid_core::{DroneIdError, PipelineConfig};
use droneid_dsp::Complex32;
use tracing::{info, warn};

use crate::bits_log::BitsLog;
use crate::frequency_scanner::FrequencyScanner;
use crate::sample_source::SampleSource;
use crate::stats::{PipelineStats, StatsSnapshot};
use crate::worker::process_chunk;

const QUEUE_CAPACITY: usize = 8;

struct Chunk {
    samples: Vec<Complex32>,
    fs: f64,
    freq_hz: f64,
}

/// Drives the receiver/worker-pool pipeline described for the live path:
/// one thread pulls samples from `source` into a bounded queue, a pool of
/// `worker_count` threads drain it and run the full demod/decode chain.
/// Workers share no mutable state beyond the atomics in [`PipelineStats`]
/// and the append-only [`BitsLog`].
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    stats: Arc<PipelineStats>,
    cancel: Arc<AtomicBool>,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig) -> Result<Self, DroneIdError> {
        config.validate()?;
        Ok(PipelineOrchestrator {
            config,
            stats: PipelineStats::shared(),
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn stats(&self) -> Arc<PipelineStats> {
        self.stats.clone()
    }

    /// Signals every thread to stop after its current chunk. Idempotent.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Runs the pipeline to completion (the source is exhausted) or until
    /// [`cancel`](Self::cancel) is called, whichever comes first. Returns
    /// the final stats snapshot.
    pub fn run(&self, mut source: impl SampleSource + 'static) -> Result<StatsSnapshot, DroneIdError> {
        let packet_type = self.config.packet_type()?;
        let fs = source.sample_rate_hz();
        let chunk_samples = (self.config.duration_per_band_s * fs) as usize;

        let (tx, rx): (Sender<Chunk>, Receiver<Chunk>) = bounded(QUEUE_CAPACITY);
        let (result_tx, result_rx): (Sender<(f64, bool)>, Receiver<(f64, bool)>) =
            bounded(QUEUE_CAPACITY * self.config.worker_count.max(1));

        let bits_log = self
            .config
            .bits_log_path
            .as_ref()
            .map(|p| Arc::new(BitsLog::new(p)));

        let mut handles = Vec::new();
        for worker_id in 0..self.config.worker_count.max(1) {
            let rx = rx.clone();
            let result_tx = result_tx.clone();
            let stats = self.stats.clone();
            let cancel = self.cancel.clone();
            let bits_log = bits_log.clone();
            let skip_detection = self.config.skip_detection;

            handles.push(thread::spawn(move || {
                while let Ok(chunk) = rx.recv() {
                    if cancel.load(Ordering::SeqCst) {
                        break;
                    }
                    let found = process_chunk(
                        &chunk.samples,
                        chunk.fs,
                        packet_type,
                        skip_detection,
                        &stats,
                        bits_log.as_deref(),
                    );
                    let _ = result_tx.send((chunk.freq_hz, found));
                }
                worker_id
            }));
        }
        drop(result_tx);

        let frequencies_hz = if self.config.frequencies_to_scan_hz.is_empty() {
            crate::frequency_scanner::DEFAULT_FREQUENCIES_MHZ
                .iter()
                .map(|mhz| mhz * 1.0e6)
                .collect()
        } else {
            self.config.frequencies_to_scan_hz.clone()
        };
        let mut scanner = FrequencyScanner::new(frequencies_hz, self.config.lock_giveup_after);

        while !self.cancel.load(Ordering::SeqCst) {
            // Fold in every result a worker has finished since the last
            // chunk was dispatched. Workers run concurrently and may finish
            // out of chunk order, so this is a best-effort lock heuristic,
            // not a guarantee the scanner reacts to this exact chunk next.
            loop {
                match result_rx.try_recv() {
                    Ok((freq_hz, found)) => scanner.record_result(freq_hz, found),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => break,
                }
            }

            let freq_hz = scanner.next_frequency_hz();
            source.tune(freq_hz);
            let Some(samples) = source.recv_chunk(chunk_samples) else {
                break;
            };

            if tx.send(Chunk { samples, fs, freq_hz }).is_err() {
                break;
            }
        }

        drop(tx);
        for handle in handles {
            if let Err(e) = handle.join() {
                warn!(?e, "pipeline worker thread panicked");
            }
        }
        while let Ok((freq_hz, found)) = result_rx.try_recv() {
            scanner.record_result(freq_hz, found);
        }

        let snapshot = self.stats.snapshot();
        info!(
            candidates = snapshot.candidates,
            decoded = snapshot.decoded,
            crc_ok = snapshot.crc_ok,
            crc_err = snapshot.crc_err,
            "pipeline finished"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_source::FileSampleSource;
    use num::Complex;

    #[test]
    fn runs_to_completion_on_an_empty_capture() {
        let mut config = PipelineConfig::default();
        config.worker_count = 1;
        config.duration_per_band_s = 0.1;
        config.packet_type = "c2".to_string();
        config.sample_rate_hz = 1.92e6;
        config.frequencies_to_scan_hz = vec![2_414_500_000.0];

        let orchestrator = PipelineOrchestrator::new(config).unwrap();
        let source = FileSampleSource::new(vec![Complex::new(0.0f32, 0.0); 4096], 1.92e6);
        let snapshot = orchestrator.run(source).unwrap();
        assert_eq!(snapshot.decoded, 0);
    }
}
