use droneid_core::DroneIdError;
use droneid_dsp::{fshift, resample, Complex32};

const RATE_TOLERANCE_HZ: f64 = 100.0e3;

/// Mixes a packet window to DC and resamples it to `target_rate`, if
/// needed.
///
/// Only ever downsamples: a capture rate below `target_rate - tolerance`
/// is a configuration mistake (the profile can't be demodulated from too
/// narrow a capture) and fails rather than upsampling to compensate.
pub fn tune_and_resample(
    window: &[Complex32],
    fs: f64,
    offset_hz: f64,
    target_rate: f64,
) -> Result<(Vec<Complex32>, f64), DroneIdError> {
    let mixed = fshift(window, -offset_hz, fs);

    if fs > target_rate + RATE_TOLERANCE_HZ {
        let resampled = resample(&mixed, fs, target_rate);
        Ok((resampled, target_rate))
    } else if fs < target_rate - RATE_TOLERANCE_HZ {
        Err(DroneIdError::DetectionFailure(format!(
            "sample rate {fs} Hz too low for demod rate {target_rate} Hz"
        )))
    } else {
        Ok((mixed, fs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    #[test]
    fn rejects_rate_too_low() {
        let window = vec![Complex::new(0.0f32, 0.0); 16];
        let err = tune_and_resample(&window, 1.0e6, 0.0, 15.36e6).unwrap_err();
        assert!(matches!(err, DroneIdError::DetectionFailure(_)));
    }

    #[test]
    fn matching_rate_is_a_no_op_besides_mixing() {
        let window = vec![Complex::new(1.0f32, 0.0); 16];
        let (out, rate) = tune_and_resample(&window, 15.36e6, 0.0, 15.36e6).unwrap();
        assert_eq!(rate, 15.36e6);
        assert_eq!(out.len(), window.len());
    }
}
