//! Pitch detection
//!
//! Thin delegation layer over the external pitch estimators. The bridge
//! validates the frame, applies a dB silence gate, constructs a transient
//! estimator for the requested method, runs it once, and drops it before
//! returning. No estimator state survives across calls.
//!
//! Method identifiers follow the original bridge's string keying:
//!
//! - `"yin"`: time-domain YIN
//! - `"yinfft"`, `"mcleod"`, `"default"`: spectral-domain estimator
//! - `"autocorrelation"`, `"acf"`: plain autocorrelation
//!
//! The tolerance parameter is the estimator clarity threshold and applies
//! to yin/yinfft only; other methods ignore it.

use log::debug;
use pitch_detection::detector::autocorrelation::AutocorrelationDetector;
use pitch_detection::detector::mcleod::McLeodDetector;
use pitch_detection::detector::yin::YINDetector;
use pitch_detection::detector::PitchDetector;

use crate::error::{BridgeError, Result};

/// Shortest frame an estimator can do anything useful with.
const MIN_FRAME_LEN: usize = 4;

/// Pitch estimation method, keyed by the caller-supplied identifier string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchMethod {
    /// Time-domain YIN (de Cheveigné & Kawahara).
    Yin,
    /// Spectral-domain estimator; stands in for the original's yinfft.
    YinFft,
    /// Plain autocorrelation peak picking.
    Autocorrelation,
}

impl PitchMethod {
    /// Resolve a method identifier string.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "yin" => Ok(PitchMethod::Yin),
            "yinfft" | "mcleod" | "default" => Ok(PitchMethod::YinFft),
            "autocorrelation" | "acf" => Ok(PitchMethod::Autocorrelation),
            other => Err(BridgeError::UnknownMethod(other.to_string())),
        }
    }

    /// Whether the caller tolerance is forwarded to the estimator.
    fn uses_tolerance(self) -> bool {
        matches!(self, PitchMethod::Yin | PitchMethod::YinFft)
    }
}

/// Frame level in dB, `10 * log10(mean square)`.
///
/// An all-zero frame yields negative infinity, which any finite silence
/// threshold gates out.
fn level_db(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return f64::NEG_INFINITY;
    }
    let energy: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    10.0 * (energy / samples.len() as f64).log10()
}

/// Estimate the pitch of one frame of audio.
///
/// Returns the estimate in Hz, or `Ok(0.0)` when no pitch was confidently
/// detected: frames below the `silence_db` level gate, frames too short to
/// analyze, and estimates rejected by the clarity threshold all report 0.0
/// rather than an error. Unknown method identifiers and a zero sample rate
/// are errors.
///
/// The hop size of the original interface (`N/2`) becomes the estimator's
/// analysis padding.
pub fn detect_pitch(
    samples: &[f32],
    method: &str,
    sample_rate: u32,
    silence_db: f32,
    tolerance: f32,
) -> Result<f32> {
    let method = PitchMethod::parse(method)?;
    if sample_rate == 0 {
        return Err(BridgeError::Collaborator(
            "sample rate must be non-zero".to_string(),
        ));
    }

    let size = samples.len();
    if size < MIN_FRAME_LEN {
        debug!("pitch frame too short ({} samples), reporting no pitch", size);
        return Ok(0.0);
    }

    if level_db(samples) < silence_db as f64 {
        return Ok(0.0);
    }

    // The estimators run in f64; promote the frame once per call.
    let signal: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    let padding = size / 2;
    let clarity_threshold = if method.uses_tolerance() {
        tolerance as f64
    } else {
        0.0
    };

    // Transient analysis object: constructed, used once, dropped on return.
    // The level gate above replaces the estimator's own power threshold.
    let rate = sample_rate as usize;
    let estimate = match method {
        PitchMethod::Yin => {
            YINDetector::new(size, padding).get_pitch(&signal, rate, 0.0, clarity_threshold)
        }
        PitchMethod::YinFft => {
            McLeodDetector::new(size, padding).get_pitch(&signal, rate, 0.0, clarity_threshold)
        }
        PitchMethod::Autocorrelation => AutocorrelationDetector::new(size, padding).get_pitch(
            &signal,
            rate,
            0.0,
            clarity_threshold,
        ),
    };

    Ok(estimate.map(|p| p.frequency as f32).unwrap_or(0.0))
}
