use droneid_dsp::Complex32;

/// Hardware abstraction the orchestrator drives; SDR tuning and streaming
/// live outside this crate's scope and are supplied by whatever binds to a
/// real radio or a recorded file.
pub trait SampleSource: Send {
    fn sample_rate_hz(&self) -> f64;
    fn tune(&mut self, freq_hz: f64);
    /// Pulls up to `num_samples` complex samples at the current tuning.
    /// Returns `None` on a hardware timeout or end of input.
    fn recv_chunk(&mut self, num_samples: usize) -> Option<Vec<Complex32>>;
}

/// Replays a fixed in-memory capture regardless of the requested tuning,
/// for offline files and tests. Each call to `recv_chunk` advances a cursor
/// through the buffer; once exhausted, it returns `None`.
pub struct FileSampleSource {
    samples: Vec<Complex32>,
    cursor: usize,
    sample_rate_hz: f64,
}

impl FileSampleSource {
    pub fn new(samples: Vec<Complex32>, sample_rate_hz: f64) -> Self {
        FileSampleSource {
            samples,
            cursor: 0,
            sample_rate_hz,
        }
    }
}

impl SampleSource for FileSampleSource {
    fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    fn tune(&mut self, _freq_hz: f64) {}

    fn recv_chunk(&mut self, num_samples: usize) -> Option<Vec<Complex32>> {
        if self.cursor >= self.samples.len() {
            return None;
        }
        let end = (self.cursor + num_samples).min(self.samples.len());
        let chunk = self.samples[self.cursor..end].to_vec();
        self.cursor = end;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    #[test]
    fn file_source_exhausts_after_the_buffer_is_consumed() {
        let mut source = FileSampleSource::new(vec![Complex::new(1.0f32, 0.0); 10], 1.0e6);
        assert_eq!(source.recv_chunk(6).unwrap().len(), 6);
        assert_eq!(source.recv_chunk(6).unwrap().len(), 4);
        assert!(source.recv_chunk(6).is_none());
    }
}
