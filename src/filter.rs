//! In-place filtering
//!
//! Each call designs a fresh Butterworth-Q biquad section from the cutoff
//! and sample rate, runs it across the buffer, and discards it. The call
//! contract is deliberately stateless: no filter memory carries across
//! buffer boundaries, so streaming continuity is not provided here.

use biquad::{Biquad, Coefficients, DirectForm1, Hertz, Type, Q_BUTTERWORTH_F32};
use log::warn;

use crate::error::{BridgeError, Result};

/// Design a single biquad section for one call.
fn design(filter_type: Type<f32>, cutoff: f32, sample_rate: u32) -> Result<DirectForm1<f32>> {
    if sample_rate == 0 {
        return Err(BridgeError::Collaborator(
            "sample rate must be non-zero".to_string(),
        ));
    }
    if cutoff <= 0.0 {
        return Err(BridgeError::Collaborator(format!(
            "cutoff must be positive, got {}",
            cutoff
        )));
    }

    let fs = Hertz::<f32>::from_hz(sample_rate as f32)
        .map_err(|e| BridgeError::Collaborator(format!("invalid sample rate: {:?}", e)))?;
    let f0 = Hertz::<f32>::from_hz(cutoff)
        .map_err(|e| BridgeError::Collaborator(format!("invalid cutoff: {:?}", e)))?;

    let coefficients = Coefficients::<f32>::from_params(filter_type, fs, f0, Q_BUTTERWORTH_F32)
        .map_err(|e| {
            warn!("filter design failed for cutoff {} Hz: {:?}", cutoff, e);
            BridgeError::Collaborator(format!("filter design failed: {:?}", e))
        })?;

    Ok(DirectForm1::<f32>::new(coefficients))
}

fn run_in_place(
    samples: &mut [f32],
    filter_type: Type<f32>,
    cutoff: f32,
    sample_rate: u32,
) -> Result<()> {
    let mut section = design(filter_type, cutoff, sample_rate)?;
    for sample in samples.iter_mut() {
        *sample = section.run(*sample);
    }
    Ok(())
}

/// Lowpass the buffer in place at `cutoff` Hz.
///
/// A zero-length buffer is a safe no-op. Fails (leaving the buffer
/// untouched) if the cutoff is non-positive or the design falls outside
/// the representable range (cutoff beyond Nyquist).
pub fn apply_lowpass(samples: &mut [f32], cutoff: f32, sample_rate: u32) -> Result<()> {
    run_in_place(samples, Type::LowPass, cutoff, sample_rate)
}

/// "Highcut" filter the buffer in place at `cutoff` Hz.
///
/// Despite the name, this constructs a *highpass* section: the original
/// bridge's highcut operation was built on the collaborator's highpass
/// constructor, and that behavior is preserved as documented.
pub fn apply_highcut(samples: &mut [f32], cutoff: f32, sample_rate: u32) -> Result<()> {
    run_in_place(samples, Type::HighPass, cutoff, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_sine(freq: f32, sample_rate: u32, num_samples: usize) -> Vec<f32> {
        (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    /// Mean-square energy over the second half of a buffer, past the
    /// filter's startup transient.
    fn settled_energy(samples: &[f32]) -> f32 {
        let tail = &samples[samples.len() / 2..];
        tail.iter().map(|&s| s * s).sum::<f32>() / tail.len() as f32
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let mut samples = generate_sine(8000.0, 44100, 8192);
        let reference = settled_energy(&samples);

        apply_lowpass(&mut samples, 1000.0, 44100).unwrap();
        let filtered = settled_energy(&samples);

        assert!(
            filtered < reference * 0.05,
            "8 kHz tone should be strongly attenuated: {} vs {}",
            filtered,
            reference
        );
    }

    #[test]
    fn lowpass_passes_below_cutoff() {
        let mut samples = generate_sine(100.0, 44100, 8192);
        let reference = settled_energy(&samples);

        apply_lowpass(&mut samples, 1000.0, 44100).unwrap();
        let filtered = settled_energy(&samples);

        assert!(
            filtered > reference * 0.5,
            "100 Hz tone should pass: {} vs {}",
            filtered,
            reference
        );
    }

    #[test]
    fn highcut_attenuates_below_cutoff() {
        let mut samples = generate_sine(100.0, 44100, 8192);
        let reference = settled_energy(&samples);

        apply_highcut(&mut samples, 2000.0, 44100).unwrap();
        let filtered = settled_energy(&samples);

        assert!(
            filtered < reference * 0.05,
            "100 Hz tone should be strongly attenuated: {} vs {}",
            filtered,
            reference
        );
    }

    #[test]
    fn empty_buffer_is_a_noop() {
        let mut samples: Vec<f32> = Vec::new();
        apply_lowpass(&mut samples, 1000.0, 44100).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn invalid_cutoff_leaves_buffer_untouched() {
        let original = generate_sine(440.0, 44100, 256);

        let mut samples = original.clone();
        assert!(apply_lowpass(&mut samples, 0.0, 44100).is_err());
        assert_eq!(samples, original);

        // At/above Nyquist the design must fail.
        let mut samples = original.clone();
        assert!(apply_lowpass(&mut samples, 30000.0, 44100).is_err());
        assert_eq!(samples, original);
    }

    #[test]
    fn zero_sample_rate_is_an_error() {
        let mut samples = vec![0.0; 16];
        assert!(apply_lowpass(&mut samples, 1000.0, 0).is_err());
        assert!(apply_highcut(&mut samples, 1000.0, 0).is_err());
    }
}
