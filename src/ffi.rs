//! C ABI for the Dart/Flutter host
//!
//! Every function here is callable over `dart:ffi`. The boundary contract
//! is deliberately permissive and mirrors the original bridge: malformed
//! input degrades silently instead of raising: scalar operations return
//! `0.0`, in-place operations do nothing, and the allocator returns null.
//! The strict errors live in the safe Rust API underneath; this layer
//! flattens them to the documented sentinels and logs them at debug level.
//!
//! Buffer handles are created and released only through this interface.
//! Exactly one release must pair with each allocation; releasing a live
//! handle twice, or using a handle after release, is undefined behavior
//! and the caller's responsibility.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use log::debug;

use crate::buffer::{self, SharedBuffer};
use crate::{convert, filter, pitch, spectrum};

/// Convert a C string to a Rust string, None for null/invalid UTF-8.
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string()) }
}

/// Convert a Rust string to a C string the caller must free with
/// [`tonebridge_free_string`].
fn string_to_cstr(s: &str) -> *mut c_char {
    CString::new(s)
        .map(|cs| cs.into_raw())
        .unwrap_or(ptr::null_mut())
}

// ───────────────────────────────────────────────────────────────────────────
// Shared buffer management
// ───────────────────────────────────────────────────────────────────────────

/// Allocate a zero-initialized shared buffer of `size` samples.
///
/// Returns null if the allocation fails. Size 0 yields a valid empty
/// buffer. The returned handle must be released exactly once with
/// [`tonebridge_release_shared_buffer`].
#[no_mangle]
pub extern "C" fn tonebridge_create_shared_buffer(size: u32) -> *mut SharedBuffer {
    match buffer::allocate(size) {
        Ok(buf) => Box::into_raw(buf),
        Err(e) => {
            debug!("buffer allocation failed: {}", e);
            ptr::null_mut()
        }
    }
}

/// Release a shared buffer. Null handles are a no-op.
#[no_mangle]
pub extern "C" fn tonebridge_release_shared_buffer(buf: *mut SharedBuffer) {
    unsafe { buffer::release(buf) };
}

/// Number of samples in a buffer; 0 for a null handle.
#[no_mangle]
pub extern "C" fn tonebridge_buffer_size(buf: *const SharedBuffer) -> u32 {
    unsafe { buf.as_ref() }.map(|b| b.size).unwrap_or(0)
}

/// Raw sample pointer of a buffer; null for a null handle.
#[no_mangle]
pub extern "C" fn tonebridge_buffer_data(buf: *mut SharedBuffer) -> *mut f32 {
    unsafe { buf.as_mut() }
        .map(|b| b.data)
        .unwrap_or(ptr::null_mut())
}

// ───────────────────────────────────────────────────────────────────────────
// DSP operations
// ───────────────────────────────────────────────────────────────────────────

/// Estimate the pitch of the input buffer in Hz.
///
/// `method` selects the estimator ("yin", "yinfft", ...); `silence` is a
/// dB level gate; `tolerance` applies to yin/yinfft only. Returns 0.0 for
/// invalid input, unknown methods, or when no pitch is confidently
/// detected.
#[no_mangle]
pub extern "C" fn tonebridge_pitch_detect(
    input: *const SharedBuffer,
    method: *const c_char,
    samplerate: u32,
    silence: f32,
    tolerance: f32,
) -> f32 {
    let samples = match unsafe { buffer::as_slice(input) } {
        Ok(samples) => samples,
        Err(e) => {
            debug!("pitch_detect rejected: {}", e);
            return 0.0;
        }
    };
    let method = match unsafe { cstr_to_string(method) } {
        Some(m) => m,
        None => {
            debug!("pitch_detect rejected: null or invalid method string");
            return 0.0;
        }
    };

    match pitch::detect_pitch(samples, &method, samplerate, silence, tolerance) {
        Ok(freq) => freq,
        Err(e) => {
            debug!("pitch_detect degraded to 0.0: {}", e);
            0.0
        }
    }
}

/// Forward FFT of `fft_size` input samples into split half-spectrum
/// buffers of `fft_size / 2 + 1` elements each.
///
/// Performs nothing (and mutates nothing) if any handle is null or
/// aliased, or if any buffer size does not match.
#[no_mangle]
pub extern "C" fn tonebridge_fft_transform(
    input: *const SharedBuffer,
    real_out: *mut SharedBuffer,
    imag_out: *mut SharedBuffer,
    fft_size: u32,
) {
    // The two outputs (and the input) must be distinct buffers, otherwise
    // the mutable views below would alias.
    if real_out == imag_out
        || input == real_out as *const SharedBuffer
        || input == imag_out as *const SharedBuffer
    {
        debug!("fft_transform rejected: aliased buffer handles");
        return;
    }

    let result = (|| {
        let samples = unsafe { buffer::as_slice(input) }?;
        let real = unsafe { buffer::as_mut_slice(real_out) }?;
        let imag = unsafe { buffer::as_mut_slice(imag_out) }?;
        spectrum::transform_fft(samples, real, imag, fft_size)
    })();

    if let Err(e) = result {
        debug!("fft_transform degraded to no-op: {}", e);
    }
}

/// Lowpass the buffer in place at `cutoff_freq` Hz. Silent no-op on
/// invalid input.
#[no_mangle]
pub extern "C" fn tonebridge_lowpass_filter(
    buf: *mut SharedBuffer,
    cutoff_freq: f32,
    samplerate: u32,
) {
    let result = unsafe { buffer::as_mut_slice(buf) }
        .and_then(|samples| filter::apply_lowpass(samples, cutoff_freq, samplerate));
    if let Err(e) = result {
        debug!("lowpass_filter degraded to no-op: {}", e);
    }
}

/// Highcut-filter the buffer in place at `cutoff_freq` Hz (a highpass
/// section, matching the original bridge). Silent no-op on invalid input.
#[no_mangle]
pub extern "C" fn tonebridge_highcut_filter(
    buf: *mut SharedBuffer,
    cutoff_freq: f32,
    samplerate: u32,
) {
    let result = unsafe { buffer::as_mut_slice(buf) }
        .and_then(|samples| filter::apply_highcut(samples, cutoff_freq, samplerate));
    if let Err(e) = result {
        debug!("highcut_filter degraded to no-op: {}", e);
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Conversions
// ───────────────────────────────────────────────────────────────────────────

/// Frequency in Hz to fractional MIDI note (A4 = 440 Hz = 69).
#[no_mangle]
pub extern "C" fn tonebridge_freq_to_midi(freq: f32) -> f32 {
    convert::freq_to_midi(freq)
}

/// Fractional MIDI note to frequency in Hz.
#[no_mangle]
pub extern "C" fn tonebridge_midi_to_freq(midi: f32) -> f32 {
    convert::midi_to_freq(midi)
}

/// [`tonebridge_freq_to_midi`] against a custom A4 base frequency.
#[no_mangle]
pub extern "C" fn tonebridge_freq_to_midi_tuned(freq: f32, base_freq: f32) -> f32 {
    convert::freq_to_midi_tuned(freq, base_freq)
}

/// [`tonebridge_midi_to_freq`] against a custom A4 base frequency;
/// a zero base falls back to 440 Hz.
#[no_mangle]
pub extern "C" fn tonebridge_midi_to_freq_tuned(midi: f32, base_freq: f32) -> f32 {
    convert::midi_to_freq_tuned(midi, base_freq)
}

/// Interval between two frequencies in cents; 0.0 if either is
/// non-positive.
#[no_mangle]
pub extern "C" fn tonebridge_freq_to_cents(freq: f32, ref_freq: f32) -> f32 {
    convert::freq_to_cents(freq, ref_freq)
}

/// Note name for a MIDI number ("C4", "Db4", ...), `"NaN"` outside
/// [0, 127]. Caller frees the result with [`tonebridge_free_string`].
#[no_mangle]
pub extern "C" fn tonebridge_midi_to_note_name(midi: f32, use_flats: i32) -> *mut c_char {
    string_to_cstr(&convert::midi_to_note_name(midi, use_flats != 0))
}

/// Nearest MIDI note and signed cents offset for a frequency.
///
/// Returns 1 and fills the non-null out pointers on success, 0 for a
/// non-positive frequency (out pointers untouched).
#[no_mangle]
pub extern "C" fn tonebridge_freq_to_nearest_note(
    freq: f32,
    out_midi: *mut i32,
    out_cents: *mut f32,
) -> i32 {
    match convert::nearest_note(freq) {
        Some((note, cents)) => {
            unsafe {
                if !out_midi.is_null() {
                    *out_midi = note as i32;
                }
                if !out_cents.is_null() {
                    *out_cents = cents;
                }
            }
            1
        }
        None => 0,
    }
}

/// Free a string allocated by this bridge. Null is a no-op.
#[no_mangle]
pub extern "C" fn tonebridge_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_detect_on_null_input_returns_zero() {
        let method = CString::new("yin").unwrap();
        let freq =
            tonebridge_pitch_detect(ptr::null(), method.as_ptr(), 44100, -70.0, 0.7);
        assert_eq!(freq, 0.0);
    }

    #[test]
    fn pitch_detect_on_null_method_returns_zero() {
        let buf = tonebridge_create_shared_buffer(1024);
        let freq = tonebridge_pitch_detect(buf, ptr::null(), 44100, -70.0, 0.7);
        assert_eq!(freq, 0.0);
        tonebridge_release_shared_buffer(buf);
    }

    #[test]
    fn buffer_accessors_are_null_safe() {
        assert_eq!(tonebridge_buffer_size(ptr::null()), 0);
        assert!(tonebridge_buffer_data(ptr::null_mut()).is_null());
    }

    #[test]
    fn fft_rejects_aliased_outputs() {
        let input = tonebridge_create_shared_buffer(16);
        let out = tonebridge_create_shared_buffer(9);

        tonebridge_fft_transform(input, out, out, 16);
        let spectrum = unsafe { crate::buffer::as_slice(out) }.unwrap();
        assert!(spectrum.iter().all(|&s| s == 0.0));

        tonebridge_release_shared_buffer(input);
        tonebridge_release_shared_buffer(out);
    }

    #[test]
    fn filters_ignore_null_buffers() {
        tonebridge_lowpass_filter(ptr::null_mut(), 1000.0, 44100);
        tonebridge_highcut_filter(ptr::null_mut(), 1000.0, 44100);
    }

    #[test]
    fn note_name_crosses_the_boundary() {
        let name = tonebridge_midi_to_note_name(60.0, 0);
        let as_str = unsafe { CStr::from_ptr(name) }.to_str().unwrap();
        assert_eq!(as_str, "C4");
        tonebridge_free_string(name);
    }

    #[test]
    fn nearest_note_out_params() {
        let mut midi = -1;
        let mut cents = f32::NAN;
        let ok = tonebridge_freq_to_nearest_note(440.0, &mut midi, &mut cents);
        assert_eq!(ok, 1);
        assert_eq!(midi, 69);
        assert!(cents.abs() < 0.1);

        assert_eq!(
            tonebridge_freq_to_nearest_note(-1.0, &mut midi, &mut cents),
            0
        );
    }
}
