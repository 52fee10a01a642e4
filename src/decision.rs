//! Threshold-and-hysteresis decision engine.
//!
//! Per-frame threshold comparisons against a noise-floor baseline produce
//! *candidate* frames; a two-state automaton with run-length counters turns
//! candidates into the speech mask. Confirming a run retroactively writes
//! the trailing window of the mask, so the whole mask is materialized up
//! front rather than emitted as a stream.
//!
//! The pass is inherently sequential — each frame's outcome depends on the
//! running counters — and must not be parallelized.

use tracing::debug;

use crate::descriptors::{DescriptorKind, DescriptorSet};

/// Consecutive candidate (or non-candidate) frames required before the
/// automaton commits a state change.
pub const CONFIRM_RUN: usize = 7;

/// Default frame count assumed silent at the start of the recording.
pub const DEFAULT_BASELINE_FRAMES: usize = 31;

/// Per-descriptor thresholds applied to baseline-relative deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub energy: f32,
    pub zero_crossing: f32,
    pub flatness: f32,
    pub rolloff: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            energy: 5e-6,
            zero_crossing: 0.9,
            flatness: 0.12,
            rolloff: 0.7,
        }
    }
}

impl Thresholds {
    pub fn get(&self, kind: DescriptorKind) -> f32 {
        match kind {
            DescriptorKind::Energy => self.energy,
            DescriptorKind::ZeroCrossing => self.zero_crossing,
            DescriptorKind::SpectralFlatness => self.flatness,
            DescriptorKind::SpectralRolloff => self.rolloff,
        }
    }
}

/// Noise-floor reference per descriptor, estimated from the leading frames
/// of the normalized series.
///
/// Assumes the recording opens with non-speech. A speech-initial recording
/// skews the baseline toward speech values and weakens detection; that is a
/// documented modeling assumption, not something this type corrects.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Baselines {
    pub energy: f32,
    pub zero_crossing: f32,
    pub flatness: f32,
    pub rolloff: f32,
}

impl Baselines {
    /// Mean of the first `leading_frames` values of each normalized series,
    /// clamped to the series length.
    pub fn estimate(set: &DescriptorSet, leading_frames: usize) -> Self {
        Self {
            energy: mean_leading(set.series(DescriptorKind::Energy), leading_frames),
            zero_crossing: mean_leading(set.series(DescriptorKind::ZeroCrossing), leading_frames),
            flatness: mean_leading(set.series(DescriptorKind::SpectralFlatness), leading_frames),
            rolloff: mean_leading(set.series(DescriptorKind::SpectralRolloff), leading_frames),
        }
    }

    pub fn get(&self, kind: DescriptorKind) -> f32 {
        match kind {
            DescriptorKind::Energy => self.energy,
            DescriptorKind::ZeroCrossing => self.zero_crossing,
            DescriptorKind::SpectralFlatness => self.flatness,
            DescriptorKind::SpectralRolloff => self.rolloff,
        }
    }
}

fn mean_leading(series: &[f32], n: usize) -> f32 {
    let take = n.min(series.len());
    if take == 0 {
        return 0.0;
    }
    series[..take].iter().sum::<f32>() / take as f32
}

/// The automaton's two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    /// Default/initial state; frames are left unmarked.
    Silent,
    /// A candidate run of [`CONFIRM_RUN`] frames has been confirmed.
    Speech,
}

/// A committed state change, recorded when a run-length counter confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Frame index at which the run was confirmed.
    pub frame: usize,
    pub state: DecisionState,
}

/// Per-frame boolean speech classification plus the confirmed transitions
/// that produced it. Written once by [`DecisionEngine::decide`] and never
/// updated afterward.
#[derive(Debug, Clone, Default)]
pub struct SpeechMask {
    pub frames: Vec<bool>,
    pub transitions: Vec<Transition>,
}

/// Two-state hysteresis automaton over normalized descriptor series.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    thresholds: Thresholds,
    baselines: Baselines,
    confirm_run: usize,
}

impl DecisionEngine {
    pub fn new(thresholds: Thresholds, baselines: Baselines) -> Self {
        Self {
            thresholds,
            baselines,
            confirm_run: CONFIRM_RUN,
        }
    }

    /// A frame is a speech candidate when every descriptor's delta against
    /// its baseline passes the threshold in that descriptor's direction:
    /// energy must rise above baseline + threshold, the other three must
    /// stay at or below it.
    fn is_candidate(&self, set: &DescriptorSet, i: usize) -> bool {
        DescriptorKind::ALL.iter().all(|&kind| {
            let delta = set.series(kind)[i] - self.baselines.get(kind);
            let threshold = self.thresholds.get(kind);
            if kind.exceeds_for_speech() {
                delta >= threshold
            } else {
                delta <= threshold
            }
        })
    }

    /// Single forward pass producing the speech mask.
    ///
    /// When `speech_run` reaches the confirmation threshold the trailing
    /// window `[i - confirm_run, i)` is written `true` (and re-written on
    /// every further candidate frame, which is what extends a confirmed
    /// region); symmetrically for `silence_run`, which also resets both
    /// counters. A trailing run shorter than the threshold never flips the
    /// mask — there is no flush at end of stream.
    pub fn decide(&self, set: &DescriptorSet) -> SpeechMask {
        let num_frames = set.num_frames();
        let mut mask = vec![false; num_frames];
        let mut transitions = Vec::new();
        let mut state = DecisionState::Silent;
        let mut speech_run = 0usize;
        let mut silence_run = 0usize;

        for i in 0..num_frames {
            if self.is_candidate(set, i) {
                speech_run += 1;
                silence_run = 0;
                if speech_run >= self.confirm_run {
                    for slot in &mut mask[i.saturating_sub(self.confirm_run)..i] {
                        *slot = true;
                    }
                    if state == DecisionState::Silent {
                        state = DecisionState::Speech;
                        transitions.push(Transition {
                            frame: i,
                            state,
                        });
                        debug!(frame = i, "speech run confirmed");
                    }
                }
            } else {
                silence_run += 1;
                speech_run = 0;
                if silence_run >= self.confirm_run {
                    for slot in &mut mask[i.saturating_sub(self.confirm_run)..i] {
                        *slot = false;
                    }
                    if state == DecisionState::Speech {
                        state = DecisionState::Silent;
                        transitions.push(Transition {
                            frame: i,
                            state,
                        });
                        debug!(frame = i, "silence run confirmed");
                    }
                    speech_run = 0;
                    silence_run = 0;
                }
            }
        }

        SpeechMask {
            frames: mask,
            transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::DescriptorSet;

    /// Descriptor set where `energy[i] = 1.0` makes frame `i` a candidate
    /// and `energy[i] = 0.0` does not (the other three series are zero and
    /// pass their `<=` comparisons trivially).
    fn scripted(candidates: &[bool]) -> DescriptorSet {
        let energy: Vec<f32> = candidates.iter().map(|&c| if c { 1.0 } else { 0.0 }).collect();
        let zeros = vec![0.0f32; candidates.len()];
        DescriptorSet {
            energy,
            zero_crossing: zeros.clone(),
            flatness: zeros.clone(),
            rolloff: zeros,
        }
    }

    fn engine() -> DecisionEngine {
        DecisionEngine::new(
            Thresholds {
                energy: 0.5,
                zero_crossing: 1.0,
                flatness: 1.0,
                rolloff: 1.0,
            },
            Baselines::default(),
        )
    }

    #[test]
    fn short_candidate_run_never_confirms() {
        let mut pattern = vec![false; 30];
        for slot in &mut pattern[10..13] {
            *slot = true;
        }
        let mask = engine().decide(&scripted(&pattern));
        assert!(mask.frames.iter().all(|&m| !m));
        assert!(mask.transitions.is_empty());
    }

    #[test]
    fn flicker_is_suppressed() {
        let pattern: Vec<bool> = (0..40).map(|i| i % 2 == 0).collect();
        let mask = engine().decide(&scripted(&pattern));
        assert!(mask.frames.iter().all(|&m| !m));
    }

    #[test]
    fn exact_confirmation_run_backfills_trailing_window() {
        // Candidates at frames 10..=16: the 7th lands on frame 16 and the
        // trailing window [9, 16) is written.
        let mut pattern = vec![false; 40];
        for slot in &mut pattern[10..17] {
            *slot = true;
        }
        let mask = engine().decide(&scripted(&pattern));
        let marked: Vec<usize> = (0..40).filter(|&i| mask.frames[i]).collect();
        assert_eq!(marked, (9..16).collect::<Vec<_>>());
        assert_eq!(mask.transitions.len(), 2);
        assert_eq!(mask.transitions[0].frame, 16);
        assert_eq!(mask.transitions[0].state, DecisionState::Speech);
        assert_eq!(mask.transitions[1].state, DecisionState::Silent);
    }

    #[test]
    fn long_run_extends_through_repeated_marking() {
        let mut pattern = vec![false; 60];
        for slot in &mut pattern[20..45] {
            *slot = true;
        }
        let mask = engine().decide(&scripted(&pattern));
        // Marking stops at the last candidate (frame 44), whose window
        // covers up to frame 43; backfill starts one before the run.
        let marked: Vec<usize> = (0..60).filter(|&i| mask.frames[i]).collect();
        assert_eq!(marked, (19..44).collect::<Vec<_>>());
    }

    #[test]
    fn single_frame_dropout_restarts_the_run() {
        let mut pattern = vec![false; 60];
        for slot in &mut pattern[20..45] {
            *slot = true;
        }
        pattern[30] = false;
        let mask = engine().decide(&scripted(&pattern));
        // Marking stops at the dropout and resumes once seven candidates
        // reconfirm after it; the trailing window of the reconfirmation
        // reaches back to the gap frame itself but not past it.
        let marked: Vec<usize> = (0..60).filter(|&i| mask.frames[i]).collect();
        let expected: Vec<usize> = (19..29).chain(30..44).collect();
        assert_eq!(marked, expected);
        // One frame of dropout does not confirm a silence transition.
        assert_eq!(mask.transitions.len(), 2);
    }

    #[test]
    fn trailing_unconfirmed_run_is_dropped() {
        // Five candidates at the very end never reach the threshold, so the
        // mask stays silent — end of stream does not flush.
        let mut pattern = vec![false; 30];
        for slot in &mut pattern[25..30] {
            *slot = true;
        }
        let mask = engine().decide(&scripted(&pattern));
        assert!(mask.frames.iter().all(|&m| !m));
    }

    #[test]
    fn confirmed_silence_run_returns_to_silent() {
        let mut pattern = vec![false; 80];
        for slot in &mut pattern[10..40] {
            *slot = true;
        }
        let mask = engine().decide(&scripted(&pattern));
        assert_eq!(mask.transitions.len(), 2);
        assert_eq!(mask.transitions[0].state, DecisionState::Speech);
        assert_eq!(mask.transitions[1].state, DecisionState::Silent);
        // Silence reconfirms at frame 46 (7 non-candidates after frame 39).
        assert_eq!(mask.transitions[1].frame, 46);
        // No confirmed run in the mask is shorter than the threshold.
        let mut run = 1usize;
        for i in 1..mask.frames.len() {
            if mask.frames[i] == mask.frames[i - 1] {
                run += 1;
            } else {
                assert!(run >= CONFIRM_RUN, "run of length {run} ending at {i}");
                run = 1;
            }
        }
    }

    #[test]
    fn baselines_clamp_to_series_length() {
        let set = DescriptorSet {
            energy: vec![0.5; 4],
            zero_crossing: vec![0.25; 4],
            flatness: vec![1.0; 4],
            rolloff: vec![0.75; 4],
        };
        let baselines = Baselines::estimate(&set, 31);
        assert_eq!(baselines.energy, 0.5);
        assert_eq!(baselines.zero_crossing, 0.25);
        assert_eq!(baselines.flatness, 1.0);
        assert_eq!(baselines.rolloff, 0.75);
    }

    #[test]
    fn baselines_of_empty_set_are_zero() {
        let baselines = Baselines::estimate(&DescriptorSet::default(), 31);
        assert_eq!(baselines, Baselines::default());
    }
}
