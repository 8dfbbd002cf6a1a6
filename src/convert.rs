//! Musical-unit conversions
//!
//! Pure functions mapping between frequency (Hz), MIDI note numbers,
//! cents, and note names. Equal temperament referenced to A4 = 440 Hz
//! unless a custom base tuning is supplied. No native delegation here;
//! these formulas are the only numeric logic original to the bridge.

/// Pitch-class names with sharp spelling.
const NAMES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch-class names with flat spelling.
const NAMES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Convert a frequency in Hz to a (fractional) MIDI note number.
///
/// MIDI note = 69 + 12 * log2(freq / 440)
pub fn freq_to_midi(freq: f32) -> f32 {
    freq_to_midi_tuned(freq, 440.0)
}

/// Convert a (fractional) MIDI note number to a frequency in Hz.
pub fn midi_to_freq(midi: f32) -> f32 {
    440.0 * 2.0_f32.powf((midi - 69.0) / 12.0)
}

/// [`freq_to_midi`] against a custom base tuning for A4.
pub fn freq_to_midi_tuned(freq: f32, base_freq: f32) -> f32 {
    69.0 + 12.0 * (freq / base_freq).log2()
}

/// [`midi_to_freq`] against a custom base tuning for A4.
///
/// A zero `base_freq` falls back to standard 440 Hz tuning.
pub fn midi_to_freq_tuned(midi: f32, base_freq: f32) -> f32 {
    let base = if base_freq == 0.0 { 440.0 } else { base_freq };
    base * 2.0_f32.powf((midi - 69.0) / 12.0)
}

/// Interval between two frequencies in cents.
///
/// Returns 0.0 if either frequency is non-positive (log2 guard);
/// otherwise 1200 * log2(freq / ref_freq).
pub fn freq_to_cents(freq: f32, ref_freq: f32) -> f32 {
    if freq <= 0.0 || ref_freq <= 0.0 {
        return 0.0;
    }
    1200.0 * (freq / ref_freq).log2()
}

/// Spell a MIDI note number as a note name, e.g. 60 -> "C4".
///
/// `midi` is rounded to the nearest integer; anything that rounds outside
/// the MIDI range `[0, 127]` (including NaN input) yields the sentinel
/// `"NaN"`. The octave follows the MIDI convention where note 60 is C4.
pub fn midi_to_note_name(midi: f32, use_flats: bool) -> String {
    let rounded = midi.round();
    if !(0.0..=127.0).contains(&rounded) {
        return "NaN".to_string();
    }

    let note = rounded as u32;
    let names = if use_flats { &NAMES_FLAT } else { &NAMES_SHARP };
    let name = names[(note % 12) as usize];
    let octave = (note / 12) as i32 - 1;
    format!("{}{}", name, octave)
}

/// Nearest MIDI note to a frequency, with its cents deviation.
///
/// Returns `None` for non-positive frequencies. The cents offset is the
/// signed distance from the returned note's exact frequency, so a perfectly
/// tuned input yields an offset near zero.
pub fn nearest_note(freq: f32) -> Option<(u8, f32)> {
    if freq <= 0.0 {
        return None;
    }

    let note = freq_to_midi(freq).round().clamp(0.0, 127.0) as u8;
    let cents = freq_to_cents(freq, midi_to_freq(note as f32));
    Some((note, cents))
}
