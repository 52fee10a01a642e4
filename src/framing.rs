//! Overlapping-frame decomposition of a waveform.
//!
//! Frame length and step are given in seconds and converted to sample counts
//! by rounding half away from zero, the same convention the segment
//! arithmetic in [`crate::segments`] uses. The waveform is zero-padded at the
//! tail so every frame, including the last, is full length, and a Blackman
//! taper is applied to each frame after extraction.

use crate::error::{Result, VadcutError};

/// A waveform split into fixed-length, windowed, overlapping frames.
///
/// Invariants (`n` = signal length, `L` = frame length, `S` = frame step):
/// - `num_frames = ceil(|n - L| / S)`
/// - padded signal length = `num_frames * S + L`
#[derive(Debug, Clone)]
pub struct FramedSignal {
    /// Windowed frames stored back to back, `frame_len` samples each.
    data: Vec<f32>,
    frame_len: usize,
    frame_step: usize,
}

impl FramedSignal {
    pub fn num_frames(&self) -> usize {
        if self.frame_len == 0 {
            return 0;
        }
        self.data.len() / self.frame_len
    }

    /// Frame length in samples.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Hop between consecutive frame starts, in samples.
    pub fn frame_step(&self) -> usize {
        self.frame_step
    }

    /// Borrow frame `i`.
    ///
    /// # Panics
    /// Panics if `i >= num_frames()`.
    pub fn frame(&self, i: usize) -> &[f32] {
        &self.data[i * self.frame_len..(i + 1) * self.frame_len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.frame_len)
    }

    /// Overlap-add reconstruction of the first `signal_len` samples.
    ///
    /// Divides the accumulated frames by the accumulated Blackman window so
    /// that `deframe(frame(w)) ≈ w` over the region not made of tail padding.
    pub fn deframe(&self, signal_len: usize) -> Vec<f32> {
        let num_frames = self.num_frames();
        if num_frames == 0 || self.frame_len == 0 {
            return vec![0.0; signal_len];
        }

        let padded_len = (num_frames - 1) * self.frame_step + self.frame_len;
        let window = blackman(self.frame_len);
        let mut acc = vec![0.0f32; padded_len];
        let mut correction = vec![0.0f32; padded_len];

        for (i, frame) in self.iter().enumerate() {
            let offset = i * self.frame_step;
            for (j, &sample) in frame.iter().enumerate() {
                acc[offset + j] += sample;
                // Keep the divisor nonzero where the window itself is zero.
                correction[offset + j] += window[j] + 1e-15;
            }
        }

        let mut out: Vec<f32> = acc
            .iter()
            .zip(correction.iter())
            .map(|(&a, &c)| a / c)
            .collect();
        out.truncate(signal_len);
        out.resize(signal_len, 0.0);
        out
    }
}

/// Convert a duration in seconds to a sample count, rounding half away
/// from zero.
pub fn samples_from_secs(secs: f64, sample_rate: u32) -> usize {
    (secs * f64::from(sample_rate)).round() as usize
}

/// Split `samples` into overlapping Blackman-windowed frames.
///
/// # Errors
/// Returns [`VadcutError::InvalidConfiguration`] before any allocation when
/// the frame length is not positive, the overlap is negative or at least as
/// long as the frame, or the sample rate is zero.
pub fn frame(
    samples: &[f32],
    sample_rate: u32,
    frame_length_sec: f64,
    frame_overlap_sec: f64,
) -> Result<FramedSignal> {
    if sample_rate == 0 {
        return Err(VadcutError::InvalidConfiguration(
            "sample rate must be positive".into(),
        ));
    }
    if !(frame_length_sec > 0.0) {
        return Err(VadcutError::InvalidConfiguration(format!(
            "frame length must be positive, got {frame_length_sec}s"
        )));
    }
    if frame_overlap_sec < 0.0 || frame_overlap_sec >= frame_length_sec {
        return Err(VadcutError::InvalidConfiguration(format!(
            "frame overlap ({frame_overlap_sec}s) must be in [0, frame length) \
             ({frame_length_sec}s)"
        )));
    }

    let frame_len = samples_from_secs(frame_length_sec, sample_rate);
    let overlap = samples_from_secs(frame_overlap_sec, sample_rate);
    if frame_len == 0 || overlap >= frame_len {
        return Err(VadcutError::InvalidConfiguration(format!(
            "frame geometry degenerates at {sample_rate} Hz: \
             length {frame_len} samples, overlap {overlap} samples"
        )));
    }
    let frame_step = frame_len - overlap;

    let num_frames = num_frames_for(samples.len(), frame_len, frame_step);
    let padded_len = num_frames * frame_step + frame_len;
    let window = blackman(frame_len);

    let mut data = Vec::with_capacity(num_frames * frame_len);
    for i in 0..num_frames {
        let offset = i * frame_step;
        for j in 0..frame_len {
            let sample = samples.get(offset + j).copied().unwrap_or(0.0);
            data.push(sample * window[j]);
        }
        debug_assert!(offset + frame_len <= padded_len);
    }

    Ok(FramedSignal {
        data,
        frame_len,
        frame_step,
    })
}

/// `ceil(|signal_len - frame_len| / frame_step)`.
pub fn num_frames_for(signal_len: usize, frame_len: usize, frame_step: usize) -> usize {
    let span = signal_len.abs_diff(frame_len);
    span.div_ceil(frame_step)
}

/// Symmetric Blackman window of length `n`.
pub fn blackman(n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![1.0; n];
    }
    let denom = (n - 1) as f32;
    (0..n)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / denom;
            0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
        })
        .collect()
}

/// Symmetric Hann window of length `n`.
pub fn hann(n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![1.0; n];
    }
    let denom = (n - 1) as f32;
    (0..n)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / denom;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}
