//! End-to-end speech extraction pipeline.
//!
//! Wires the stages together in fixed order: framing, descriptor series,
//! min-max normalization, baseline estimation, hysteresis decision, segment
//! extraction. Each stage consumes the previous stage's output whole; there
//! is no streaming.

pub mod events;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::decision::{Baselines, DecisionEngine, SpeechMask, Thresholds, DEFAULT_BASELINE_FRAMES};
use crate::descriptors::{DescriptorExtractor, DescriptorKind, DescriptorSet};
use crate::error::{Result, VadcutError};
use crate::framing;
use crate::normalize;
use crate::segments::{self, SegmentRange};
use crate::signal::{self, Waveform, PREEMPHASIS_COEFF};

pub use events::{NullObserver, PipelineEvent, PipelineObserver, RecordingObserver};

/// Tunable parameters of one extraction run.
///
/// Serializable so a run can be configured from a JSON file; every field
/// has a default, so a partial (or empty) document is valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VadConfig {
    /// Analysis frame length in seconds.
    pub frame_length_sec: f64,
    /// Overlap between consecutive frames in seconds.
    pub frame_overlap_sec: f64,
    /// Normalized energy must rise at least this far above baseline.
    pub energy_threshold: f32,
    /// Normalized zero-crossing rate must stay within this delta of baseline.
    pub zero_crossing_threshold: f32,
    /// Normalized spectral flatness must stay within this delta of baseline.
    pub flatness_threshold: f32,
    /// Normalized spectral rolloff must stay within this delta of baseline.
    pub rolloff_threshold: f32,
    /// Leading frames averaged into the noise-floor baseline.
    pub baseline_frame_count: usize,
    /// High-pass coefficient applied before the spectral descriptors.
    pub preemphasis_coeff: f32,
}

impl Default for VadConfig {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            frame_length_sec: 0.03,
            frame_overlap_sec: 0.015,
            energy_threshold: thresholds.energy,
            zero_crossing_threshold: thresholds.zero_crossing,
            flatness_threshold: thresholds.flatness,
            rolloff_threshold: thresholds.rolloff,
            baseline_frame_count: DEFAULT_BASELINE_FRAMES,
            preemphasis_coeff: PREEMPHASIS_COEFF,
        }
    }
}

impl VadConfig {
    /// Rejects geometries the framer cannot satisfy, before any audio is
    /// touched.
    pub fn validate(&self) -> Result<()> {
        if !(self.frame_length_sec > 0.0) {
            return Err(VadcutError::InvalidConfiguration(format!(
                "frame length must be positive, got {}s",
                self.frame_length_sec
            )));
        }
        if self.frame_overlap_sec < 0.0 || self.frame_overlap_sec >= self.frame_length_sec {
            return Err(VadcutError::InvalidConfiguration(format!(
                "frame overlap ({}s) must be in [0, frame length) ({}s)",
                self.frame_overlap_sec, self.frame_length_sec
            )));
        }
        if self.baseline_frame_count == 0 {
            return Err(VadcutError::InvalidConfiguration(
                "baseline frame count must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn thresholds(&self) -> Thresholds {
        Thresholds {
            energy: self.energy_threshold,
            zero_crossing: self.zero_crossing_threshold,
            flatness: self.flatness_threshold,
            rolloff: self.rolloff_threshold,
        }
    }
}

/// Everything one run produces, for callers that want more than the
/// concatenated speech audio.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Speech-classified samples concatenated in original order.
    pub speech: Waveform,
    /// Per-frame speech mask.
    pub mask: Vec<bool>,
    /// Sample ranges of the speech segments in the input.
    pub segments: Vec<SegmentRange>,
    /// Normalized descriptor series the decision was made from.
    pub descriptors: DescriptorSet,
    /// Noise-floor baselines estimated from the leading frames.
    pub baselines: Baselines,
}

/// Runs the full pipeline over a decoded waveform.
#[derive(Debug, Clone)]
pub struct SpeechExtractor {
    config: VadConfig,
}

impl SpeechExtractor {
    /// # Errors
    /// Returns [`VadcutError::InvalidConfiguration`] if `config` fails
    /// validation.
    pub fn new(config: VadConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &VadConfig {
        &self.config
    }

    /// Run the pipeline without progress reporting.
    pub fn run(&self, waveform: &Waveform) -> Result<Extraction> {
        self.run_with_observer(waveform, &mut NullObserver)
    }

    /// Run the pipeline, reporting each milestone to `observer`.
    pub fn run_with_observer(
        &self,
        waveform: &Waveform,
        observer: &mut dyn PipelineObserver,
    ) -> Result<Extraction> {
        let config = &self.config;
        info!(
            samples = waveform.len(),
            sample_rate = waveform.sample_rate,
            duration_secs = waveform.duration_secs(),
            "starting speech extraction"
        );

        let framed = framing::frame(
            &waveform.samples,
            waveform.sample_rate,
            config.frame_length_sec,
            config.frame_overlap_sec,
        )?;
        let emphasized = signal::preemphasis(&waveform.samples, config.preemphasis_coeff);
        let framed_emphasized = framing::frame(
            &emphasized,
            waveform.sample_rate,
            config.frame_length_sec,
            config.frame_overlap_sec,
        )?;

        let extractor = DescriptorExtractor::new(waveform.sample_rate);
        let mut descriptors = DescriptorSet::default();
        for kind in DescriptorKind::ALL {
            let source = if kind.uses_preemphasis() {
                &framed_emphasized
            } else {
                &framed
            };
            let series = extractor.series(kind, source);
            descriptors.set_series(kind, normalize::min_max(&series));
            debug!(descriptor = kind.name(), "descriptor series normalized");
        }
        observer.on_event(&PipelineEvent::DescriptorsComputed {
            num_frames: descriptors.num_frames(),
        });

        let baselines = Baselines::estimate(&descriptors, config.baseline_frame_count);
        observer.on_event(&PipelineEvent::BaselinesEstimated {
            leading_frames: config.baseline_frame_count,
            energy: baselines.energy,
            zero_crossing: baselines.zero_crossing,
            flatness: baselines.flatness,
            rolloff: baselines.rolloff,
        });

        let engine = DecisionEngine::new(config.thresholds(), baselines);
        let SpeechMask { frames: mask, transitions } = engine.decide(&descriptors);
        for transition in &transitions {
            observer.on_event(&PipelineEvent::StateConfirmed {
                frame: transition.frame,
                speech: transition.state == crate::decision::DecisionState::Speech,
            });
        }

        let edges = segments::mask_edges(&mask);
        let ranges = segments::segment_ranges(
            &edges,
            config.frame_length_sec,
            waveform.sample_rate,
            waveform.len(),
        );
        let speech_samples = segments::extract(&waveform.samples, &ranges);
        observer.on_event(&PipelineEvent::SegmentsExtracted {
            segments: ranges.len(),
            speech_samples: speech_samples.len(),
        });
        info!(
            segments = ranges.len(),
            speech_samples = speech_samples.len(),
            total_samples = waveform.len(),
            "speech extraction finished"
        );

        Ok(Extraction {
            speech: Waveform::new(speech_samples, waveform.sample_rate),
            mask,
            segments: ranges,
            descriptors,
            baselines,
        })
    }
}
