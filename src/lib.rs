//! # vadcut
//!
//! Voice-activity detection and speech extraction for recorded audio.
//!
//! ## Architecture
//!
//! ```text
//! WAV file → Waveform → framing (Blackman) → descriptor series ×4
//!                                                   │
//!                                          min-max normalization
//!                                                   │
//!                                  baseline estimate (leading frames)
//!                                                   │
//!                                    hysteresis decision → speech mask
//!                                                   │
//!                                  segment ranges → speech-only audio
//! ```
//!
//! The pipeline is single-pass and operates on the whole recording at once;
//! there is no streaming mode. [`pipeline::SpeechExtractor`] is the façade,
//! the stage modules below it are usable on their own.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod decision;
pub mod descriptors;
pub mod error;
pub mod framing;
pub mod normalize;
pub mod pipeline;
pub mod segments;
pub mod signal;
pub mod wav;

// Convenience re-exports for downstream crates
pub use decision::{Baselines, DecisionEngine, SpeechMask, Thresholds};
pub use error::{Result, VadcutError};
pub use pipeline::{Extraction, PipelineEvent, PipelineObserver, SpeechExtractor, VadConfig};
pub use segments::SegmentRange;
pub use signal::Waveform;
