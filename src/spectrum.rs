//! Spectral transform
//!
//! Forward FFT of a real input frame into the caller's split half-spectrum
//! buffers. The transform itself is delegated to rustfft; this module only
//! validates buffer shapes, promotes the samples to complex, and copies the
//! non-redundant bins out. The FFT plan is transient per call.

use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{BridgeError, Result};

/// Length of the non-redundant half-spectrum for a real transform of
/// even size: `fft_size / 2 + 1`.
pub fn half_spectrum_len(fft_size: u32) -> usize {
    fft_size as usize / 2 + 1
}

/// Run a forward FFT of `fft_size` real samples.
///
/// `input` must hold exactly `fft_size` samples; `real_out` and `imag_out`
/// must each hold exactly `fft_size / 2 + 1` elements and are fully
/// overwritten on success. On any shape violation nothing is computed and
/// neither output is touched.
pub fn transform_fft(
    input: &[f32],
    real_out: &mut [f32],
    imag_out: &mut [f32],
    fft_size: u32,
) -> Result<()> {
    let n = fft_size as usize;
    if n == 0 {
        return Err(BridgeError::Collaborator(
            "fft size must be non-zero".to_string(),
        ));
    }
    if input.len() != n {
        return Err(BridgeError::SizeMismatch {
            expected: n,
            actual: input.len(),
        });
    }

    let half = half_spectrum_len(fft_size);
    if real_out.len() != half {
        return Err(BridgeError::SizeMismatch {
            expected: half,
            actual: real_out.len(),
        });
    }
    if imag_out.len() != half {
        return Err(BridgeError::SizeMismatch {
            expected: half,
            actual: imag_out.len(),
        });
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f32>> =
        input.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    for (i, bin) in buffer[..half].iter().enumerate() {
        real_out[i] = bin.re;
        imag_out[i] = bin.im;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FFT_SIZE: u32 = 512;

    fn run(input: &[f32]) -> (Vec<f32>, Vec<f32>) {
        let half = half_spectrum_len(FFT_SIZE);
        let mut real = vec![0.0; half];
        let mut imag = vec![0.0; half];
        transform_fft(input, &mut real, &mut imag, FFT_SIZE).unwrap();
        (real, imag)
    }

    #[test]
    fn dc_input_concentrates_in_bin_zero() {
        let input = vec![1.0; FFT_SIZE as usize];
        let (real, imag) = run(&input);

        assert_relative_eq!(real[0], FFT_SIZE as f32, epsilon = 1e-2);
        for i in 1..real.len() {
            assert!(real[i].abs() < 1e-2, "bin {} leaked {}", i, real[i]);
            assert!(imag[i].abs() < 1e-2, "bin {} leaked {}", i, imag[i]);
        }
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        // Exactly 8 cycles over the frame puts all energy in bin 8.
        let n = FFT_SIZE as usize;
        let input: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 8.0 * i as f32 / n as f32).sin())
            .collect();
        let (real, imag) = run(&input);

        let magnitudes: Vec<f32> = real
            .iter()
            .zip(&imag)
            .map(|(re, im)| (re * re + im * im).sqrt())
            .collect();

        let peak_bin = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 8);
        // The analytic peak magnitude for a unit sine is N/2.
        assert_relative_eq!(magnitudes[8], n as f32 / 2.0, max_relative = 1e-3);
    }

    #[test]
    fn mismatched_input_length_is_rejected() {
        let half = half_spectrum_len(FFT_SIZE);
        let input = vec![0.0; FFT_SIZE as usize - 1];
        let mut real = vec![0.0; half];
        let mut imag = vec![0.0; half];

        let result = transform_fft(&input, &mut real, &mut imag, FFT_SIZE);
        assert!(matches!(result, Err(BridgeError::SizeMismatch { .. })));
    }

    #[test]
    fn mismatched_outputs_leave_buffers_untouched() {
        let input = vec![1.0; FFT_SIZE as usize];
        let mut real = vec![7.0; FFT_SIZE as usize / 2]; // one short
        let mut imag = vec![7.0; half_spectrum_len(FFT_SIZE)];

        let result = transform_fft(&input, &mut real, &mut imag, FFT_SIZE);
        assert!(result.is_err());
        assert!(real.iter().all(|&s| s == 7.0));
        assert!(imag.iter().all(|&s| s == 7.0));
    }

    #[test]
    fn zero_fft_size_is_rejected() {
        let mut real = vec![0.0; 1];
        let mut imag = vec![0.0; 1];
        assert!(transform_fft(&[], &mut real, &mut imag, 0).is_err());
    }
}
