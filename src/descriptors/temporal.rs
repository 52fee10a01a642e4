//! Time-domain descriptors: short-term energy and zero-crossing rate.

use crate::framing::hann;

/// Mean squared magnitude of the frame: `Σ|x|² / len`.
pub fn short_term_energy(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = frame.iter().map(|s| s * s).sum();
    sum_sq / frame.len() as f32
}

/// Sign changes per sample over a Hann-windowed copy of the frame.
///
/// Exact zeros take the negative sign, so a crossing through zero is
/// counted once rather than twice.
pub fn zero_crossing_rate(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let window = hann(frame.len());
    let mut crossings = 0usize;
    let mut prev_positive = sign_is_positive(frame[0] * window[0]);
    for (s, w) in frame.iter().zip(window.iter()).skip(1) {
        let positive = sign_is_positive(s * w);
        if positive != prev_positive {
            crossings += 1;
        }
        prev_positive = positive;
    }
    crossings as f32 / frame.len() as f32
}

fn sign_is_positive(x: f32) -> bool {
    x > 0.0
}
