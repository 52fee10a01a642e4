//! Frequency-domain descriptors: spectral flatness and spectral rolloff.
//!
//! Both are computed over the pre-emphasized, reframed signal. Flatness
//! works directly on the time-domain frame (geometric vs. arithmetic mean);
//! rolloff goes through a fixed-size FFT magnitude spectrum.

use rustfft::{num_complex::Complex32, Fft};

/// Epsilon substituted for degenerate descriptor inputs.
///
/// The flatness ratio divides a geometric mean by an arithmetic mean, and
/// either can be exactly zero for silent or zero-mean frames. Flooring both
/// at this value keeps the result finite, so NaN can never reach the
/// threshold comparisons in the decision engine (where it would silently
/// evaluate false and corrupt the mask).
pub const DEGENERATE_FLOOR: f32 = 1e-10;

/// `10 * log10(geometric_mean(|x|) / |arithmetic_mean(x)|)`, in dB.
///
/// The geometric mean is evaluated in the log domain with every magnitude
/// floored at [`DEGENERATE_FLOOR`]; the arithmetic mean is rectified and
/// floored the same way.
pub fn spectral_flatness(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let len = frame.len() as f32;
    let log_sum: f32 = frame
        .iter()
        .map(|x| x.abs().max(DEGENERATE_FLOOR).ln())
        .sum();
    let geometric_mean = (log_sum / len).exp();
    let mean = frame.iter().sum::<f32>() / len;
    let arithmetic_mean = mean.abs().max(DEGENERATE_FLOOR);
    10.0 * (geometric_mean / arithmetic_mean).log10()
}

/// Frequency (Hz) below which `percent` of the cumulative spectral energy
/// of the frame lies.
///
/// The frame is zero-padded (or truncated) to `fft_size` and the energy
/// spectrum is accumulated over the non-negative frequency bins. An
/// all-zero frame has no spectral energy and rolls off at 0 Hz.
pub fn spectral_rolloff(
    frame: &[f32],
    fft: &dyn Fft<f32>,
    fft_size: usize,
    sample_rate: u32,
    percent: f32,
) -> f32 {
    let mut buf = vec![Complex32::new(0.0, 0.0); fft_size];
    for (slot, &sample) in buf.iter_mut().zip(frame.iter()) {
        slot.re = sample;
    }
    fft.process(&mut buf);

    let half = fft_size / 2 + 1;
    let energies: Vec<f32> = buf[..half].iter().map(|c| c.norm_sqr()).collect();
    let total: f32 = energies.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let bin_hz = sample_rate as f32 / fft_size as f32;
    let target = percent * total;
    let mut cumulative = 0.0f32;
    for (bin, &energy) in energies.iter().enumerate() {
        cumulative += energy;
        if cumulative >= target {
            return bin as f32 * bin_hz;
        }
    }
    (half - 1) as f32 * bin_hz
}
