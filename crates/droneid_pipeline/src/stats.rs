use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Cross-worker decode counters. Workers share no other mutable state, so a
/// handful of atomics is enough; no lock is needed.
#[derive(Default)]
pub struct PipelineStats {
    candidates: AtomicUsize,
    decoded: AtomicUsize,
    crc_ok: AtomicUsize,
    crc_err: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub candidates: usize,
    pub decoded: usize,
    pub crc_ok: usize,
    pub crc_err: usize,
}

impl PipelineStats {
    pub fn shared() -> Arc<PipelineStats> {
        Arc::new(PipelineStats::default())
    }

    pub fn add_candidate(&self) {
        self.candidates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_decoded(&self) {
        self.decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_crc_ok(&self) {
        self.crc_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_crc_err(&self) {
        self.crc_err.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            candidates: self.candidates.load(Ordering::Relaxed),
            decoded: self.decoded.load(Ordering::Relaxed),
            crc_ok: self.crc_ok.load(Ordering::Relaxed),
            crc_err: self.crc_err.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counts() {
        let stats = PipelineStats::shared();
        stats.add_candidate();
        stats.add_candidate();
        stats.add_decoded();
        stats.add_crc_ok();
        let snap = stats.snapshot();
        assert_eq!(snap.candidates, 2);
        assert_eq!(snap.decoded, 1);
        assert_eq!(snap.crc_ok, 1);
        assert_eq!(snap.crc_err, 0);
    }
}
