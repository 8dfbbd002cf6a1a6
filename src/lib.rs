//! # tonebridge
//!
//! Native DSP bridge for Flutter/Dart audio apps.
//!
//! This crate contains no DSP algorithms of its own. It manages shared
//! sample buffers visible to a managed-runtime caller over `dart:ffi`,
//! validates call shapes, and forwards the numeric work to external
//! collaborators:
//!
//! - **Pitch detection**: YIN / spectral / autocorrelation estimators
//!   (`pitch-detection`), keyed by method string
//! - **Spectral transform**: forward half-spectrum FFT (`rustfft`)
//! - **Filtering**: per-call Butterworth biquad sections (`biquad`)
//! - **Conversions**: pure frequency/MIDI/cents/note-name formulas
//!
//! Two surfaces are exposed:
//!
//! - The safe Rust API in [`buffer`], [`pitch`], [`spectrum`], [`filter`],
//!   and [`convert`], with explicit [`Result`] errors.
//! - The C ABI in [`ffi`], which flattens those errors to the neutral
//!   sentinels the host expects (`0.0`, silent no-op, null handle) and
//!   never unwinds across the boundary.
//!
//! All operations are synchronous and stateless across calls: analysis
//! objects are constructed from call parameters, used once, and dropped
//! before returning. Buffers are single-owner and not thread-safe;
//! concurrent use of one handle requires external synchronization.
//!
//! ## Example
//!
//! ```rust
//! use tonebridge::{convert, pitch};
//!
//! let sample_rate = 44100;
//! let samples: Vec<f32> = (0..4096)
//!     .map(|i| {
//!         let t = i as f32 / sample_rate as f32;
//!         (2.0 * std::f32::consts::PI * 440.0 * t).sin()
//!     })
//!     .collect();
//!
//! let freq = pitch::detect_pitch(&samples, "yin", sample_rate, -70.0, 0.7).unwrap();
//! let (note, _cents) = convert::nearest_note(freq).unwrap();
//! assert_eq!(convert::midi_to_note_name(note as f32, false), "A4");
//! ```

pub mod buffer;
pub mod convert;
pub mod error;
pub mod ffi;
pub mod filter;
pub mod pitch;
pub mod spectrum;

pub use buffer::SharedBuffer;
pub use error::{BridgeError, Result};
pub use pitch::PitchMethod;
