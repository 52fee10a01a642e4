//! Per-frame speech descriptors.
//!
//! Each descriptor is a pure function from one frame to one scalar, mapped
//! over a [`FramedSignal`] to produce a series. The closed set of kinds is
//! dispatched through [`DescriptorExtractor`] so that downstream stages
//! (baseline estimation, the decision engine) never match on a specific
//! descriptor — adding a kind means extending this module only.

pub mod spectral;
pub mod temporal;

use std::sync::Arc;

use rustfft::{Fft, FftPlanner};

use crate::framing::FramedSignal;

/// FFT size used for the spectral descriptors.
pub const DEFAULT_FFT_SIZE: usize = 4096;

/// Cumulative-energy fraction defining the spectral rolloff point.
pub const DEFAULT_ROLLOFF_PERCENT: f32 = 0.97;

/// The closed set of per-frame descriptors the decision engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Mean squared magnitude of the frame.
    Energy,
    /// Sign changes per sample over a Hann-windowed copy of the frame.
    ZeroCrossing,
    /// Geometric-to-arithmetic mean ratio in dB.
    SpectralFlatness,
    /// Frequency below which 97% of the cumulative spectral energy lies.
    SpectralRolloff,
}

impl DescriptorKind {
    pub const ALL: [DescriptorKind; 4] = [
        DescriptorKind::Energy,
        DescriptorKind::ZeroCrossing,
        DescriptorKind::SpectralFlatness,
        DescriptorKind::SpectralRolloff,
    ];

    /// Whether this descriptor reads the pre-emphasized reframed signal
    /// rather than the plain one.
    pub fn uses_preemphasis(self) -> bool {
        matches!(
            self,
            DescriptorKind::SpectralFlatness | DescriptorKind::SpectralRolloff
        )
    }

    /// Direction of the threshold comparison in the speech-candidate
    /// predicate: `true` means speech frames must *exceed* baseline +
    /// threshold, `false` means they must stay at or below it.
    pub fn exceeds_for_speech(self) -> bool {
        matches!(self, DescriptorKind::Energy)
    }

    pub fn name(self) -> &'static str {
        match self {
            DescriptorKind::Energy => "energy",
            DescriptorKind::ZeroCrossing => "zero_crossing",
            DescriptorKind::SpectralFlatness => "spectral_flatness",
            DescriptorKind::SpectralRolloff => "spectral_rolloff",
        }
    }
}

/// One series per descriptor kind, each with one value per frame.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSet {
    pub energy: Vec<f32>,
    pub zero_crossing: Vec<f32>,
    pub flatness: Vec<f32>,
    pub rolloff: Vec<f32>,
}

impl DescriptorSet {
    pub fn series(&self, kind: DescriptorKind) -> &[f32] {
        match kind {
            DescriptorKind::Energy => &self.energy,
            DescriptorKind::ZeroCrossing => &self.zero_crossing,
            DescriptorKind::SpectralFlatness => &self.flatness,
            DescriptorKind::SpectralRolloff => &self.rolloff,
        }
    }

    pub fn set_series(&mut self, kind: DescriptorKind, values: Vec<f32>) {
        match kind {
            DescriptorKind::Energy => self.energy = values,
            DescriptorKind::ZeroCrossing => self.zero_crossing = values,
            DescriptorKind::SpectralFlatness => self.flatness = values,
            DescriptorKind::SpectralRolloff => self.rolloff = values,
        }
    }

    /// Number of frames covered, taken from the energy series.
    pub fn num_frames(&self) -> usize {
        self.energy.len()
    }
}

/// Computes descriptor series from framed signals.
///
/// Owns the FFT plan shared by the spectral descriptors so it is built once
/// per pipeline run instead of once per frame.
pub struct DescriptorExtractor {
    sample_rate: u32,
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    rolloff_percent: f32,
}

impl DescriptorExtractor {
    pub fn new(sample_rate: u32) -> Self {
        Self::with_fft_size(sample_rate, DEFAULT_FFT_SIZE)
    }

    pub fn with_fft_size(sample_rate: u32, fft_size: usize) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        Self {
            sample_rate,
            fft,
            fft_size,
            rolloff_percent: DEFAULT_ROLLOFF_PERCENT,
        }
    }

    /// Map one descriptor over every frame of `framed`.
    pub fn series(&self, kind: DescriptorKind, framed: &FramedSignal) -> Vec<f32> {
        framed.iter().map(|frame| self.compute(kind, frame)).collect()
    }

    fn compute(&self, kind: DescriptorKind, frame: &[f32]) -> f32 {
        match kind {
            DescriptorKind::Energy => temporal::short_term_energy(frame),
            DescriptorKind::ZeroCrossing => temporal::zero_crossing_rate(frame),
            DescriptorKind::SpectralFlatness => spectral::spectral_flatness(frame),
            DescriptorKind::SpectralRolloff => spectral::spectral_rolloff(
                frame,
                self.fft.as_ref(),
                self.fft_size,
                self.sample_rate,
                self.rolloff_percent,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing;

    #[test]
    fn series_has_one_value_per_frame() {
        let samples: Vec<f32> = (0..8_000)
            .map(|i| (2.0 * std::f32::consts::PI * 300.0 * i as f32 / 16_000.0).sin())
            .collect();
        let framed = framing::frame(&samples, 16_000, 0.03, 0.015).expect("valid framing");
        let extractor = DescriptorExtractor::new(16_000);
        for kind in DescriptorKind::ALL {
            let series = extractor.series(kind, &framed);
            assert_eq!(series.len(), framed.num_frames(), "{}", kind.name());
            assert!(
                series.iter().all(|v| v.is_finite()),
                "{} produced a non-finite value",
                kind.name()
            );
        }
    }

    #[test]
    fn descriptor_set_dispatch_round_trips() {
        let mut set = DescriptorSet::default();
        for (i, kind) in DescriptorKind::ALL.into_iter().enumerate() {
            set.set_series(kind, vec![i as f32; 4]);
        }
        for (i, kind) in DescriptorKind::ALL.into_iter().enumerate() {
            assert_eq!(set.series(kind), &[i as f32; 4]);
        }
        assert_eq!(set.num_frames(), 4);
    }
}
