//! Structured events emitted while the pipeline runs.
//!
//! The core holds no global state and does no I/O of its own; callers that
//! want progress reporting, plotting hooks, or metrics inject a
//! [`PipelineObserver`] and receive these events as they happen.

use serde::{Deserialize, Serialize};

/// Milestones of one extraction run, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum PipelineEvent {
    /// All four descriptor series have been computed and normalized.
    #[serde(rename_all = "camelCase")]
    DescriptorsComputed { num_frames: usize },
    /// The noise-floor baseline has been estimated from the leading frames.
    #[serde(rename_all = "camelCase")]
    BaselinesEstimated {
        leading_frames: usize,
        energy: f32,
        zero_crossing: f32,
        flatness: f32,
        rolloff: f32,
    },
    /// The decision engine confirmed a state change at `frame`.
    #[serde(rename_all = "camelCase")]
    StateConfirmed { frame: usize, speech: bool },
    /// Segment extraction finished.
    #[serde(rename_all = "camelCase")]
    SegmentsExtracted {
        segments: usize,
        speech_samples: usize,
    },
}

/// Receives [`PipelineEvent`]s during a run.
pub trait PipelineObserver {
    fn on_event(&mut self, event: &PipelineEvent);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn on_event(&mut self, _event: &PipelineEvent) {}
}

/// Observer that records every event, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<PipelineEvent>,
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&mut self, event: &PipelineEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_camel_case_tag_and_fields() {
        let event = PipelineEvent::StateConfirmed {
            frame: 42,
            speech: true,
        };
        let json = serde_json::to_value(&event).expect("serialize pipeline event");
        assert_eq!(json["event"], "stateConfirmed");
        assert_eq!(json["frame"], 42);
        assert_eq!(json["speech"], true);

        let round_trip: PipelineEvent =
            serde_json::from_value(json).expect("deserialize pipeline event");
        assert_eq!(round_trip, event);
    }

    #[test]
    fn baselines_event_round_trips() {
        let event = PipelineEvent::BaselinesEstimated {
            leading_frames: 31,
            energy: 0.01,
            zero_crossing: 0.4,
            flatness: 0.2,
            rolloff: 0.3,
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["event"], "baselinesEstimated");
        assert_eq!(json["leadingFrames"], 31);
        let round_trip: PipelineEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(round_trip, event);
    }

    #[test]
    fn recording_observer_collects_events() {
        let mut observer = RecordingObserver::default();
        observer.on_event(&PipelineEvent::DescriptorsComputed { num_frames: 10 });
        assert_eq!(
            observer.events,
            vec![PipelineEvent::DescriptorsComputed { num_frames: 10 }]
        );
    }
}
