use droneid_core::{DroneIdError, NB_FFT};
use droneid_dsp::{fshift, tfft, with_sample_offset, Complex32};
use num::Complex;

/// Corrections applied before splitting a candidate start point into OFDM
/// symbols. All three are optional because the demodulator re-extracts the
/// same window multiple times as each correction is discovered.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionParams {
    pub ffo_hz: Option<f64>,
    pub sampling_offset: Option<f64>,
    pub carrier_phase: Option<f64>,
}

/// Slices `samples` from `start` onward, applies whichever corrections are
/// set, and splits the result into `cp_pattern.len()` frequency-domain OFDM
/// symbols via [`tfft`].
pub fn extract_symbols(
    samples: &[Complex32],
    start: usize,
    fs: f64,
    cp_pattern: &[usize],
    n_carriers: usize,
    params: ExtractionParams,
) -> Result<Vec<Vec<Complex32>>, DroneIdError> {
    if start >= samples.len() {
        return Err(DroneIdError::DetectionFailure(
            "symbol start past end of capture".to_string(),
        ));
    }
    let mut working: Vec<Complex32> = samples[start..].to_vec();

    if let Some(ffo) = params.ffo_hz {
        working = fshift(&working, -ffo, fs);
    }
    if let Some(offset) = params.sampling_offset {
        working = with_sample_offset(&working, offset);
    }
    if let Some(phase) = params.carrier_phase {
        let rot = Complex::new((-phase).cos() as f32, (-phase).sin() as f32);
        for s in working.iter_mut() {
            *s *= rot;
        }
    }

    let frame_len: usize = cp_pattern.iter().map(|cp| cp + NB_FFT).sum();
    if working.len() < frame_len {
        return Err(DroneIdError::DetectionFailure(format!(
            "only {} samples remain after start, need {} for one frame",
            working.len(),
            frame_len
        )));
    }

    let mut symbols = Vec::with_capacity(cp_pattern.len());
    let mut pos = 0;
    for &cp in cp_pattern {
        let symbol_time = &working[pos + cp..pos + cp + NB_FFT];
        symbols.push(tfft(symbol_time, n_carriers));
        pos += cp + NB_FFT;
    }
    Ok(symbols)
}
