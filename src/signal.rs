//! Typed waveform passed between pipeline stages.

/// A decoded mono recording at a known sample rate.
///
/// Produced once by the audio boundary (or handed in by the caller) and
/// treated as read-only by every pipeline stage.
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Mono f32 samples, nominally in [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g. 16000, 44100, 48000).
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Returns the duration of this waveform in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Default pre-emphasis coefficient for the spectral descriptor path.
pub const PREEMPHASIS_COEFF: f32 = 0.97;

/// First-order high-pass filter: `y[n] = x[n] - coeff * x[n-1]`.
///
/// Flattens the spectral tilt of voiced speech before the spectral
/// descriptors are computed. `y[0]` is passed through unfiltered.
pub fn preemphasis(samples: &[f32], coeff: f32) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(samples.len());
    out.push(samples[0]);
    for pair in samples.windows(2) {
        out.push(pair[1] - coeff * pair[0]);
    }
    out
}
