//! End-to-end extraction scenarios over synthetic recordings.

use vadcut::pipeline::{PipelineEvent, RecordingObserver, SpeechExtractor, VadConfig};
use vadcut::{VadcutError, Waveform};

const SAMPLE_RATE: u32 = 16_000;

/// Config with the energy gate active and the other three descriptor gates
/// wide open (a normalized delta can never exceed 1.0), so a scenario's
/// outcome depends on energy alone.
fn energy_only_config(energy_threshold: f32) -> VadConfig {
    VadConfig {
        energy_threshold,
        zero_crossing_threshold: 1.0,
        flatness_threshold: 1.0,
        rolloff_threshold: 1.0,
        ..VadConfig::default()
    }
}

fn tone(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / SAMPLE_RATE as f32).sin()
        })
        .collect()
}

#[test]
fn constant_signal_produces_no_segments() {
    // Every interior frame has identical energy, so no frame can rise above
    // the baseline and the mask stays silent throughout.
    let waveform = Waveform::new(vec![0.5; 48_000], SAMPLE_RATE);
    let extractor = SpeechExtractor::new(VadConfig::default()).expect("default config");
    let extraction = extractor.run(&waveform).expect("run succeeds");

    assert!(extraction.segments.is_empty());
    assert!(extraction.speech.is_empty());
    assert!(extraction.mask.iter().all(|&m| !m));
}

#[test]
fn tone_burst_is_extracted_as_one_segment() {
    // Silence, then a 1-second 440 Hz tone aligned to a frame step boundary
    // (16080 = 67 * 240 at 30 ms frames with 15 ms overlap), then silence.
    let tone_start = 16_080;
    let tone_len = 16_000;
    let mut samples = vec![0.0f32; tone_start];
    samples.extend(tone(440.0, 0.5, tone_len));
    samples.extend(std::iter::repeat(0.0).take(15_920));
    let waveform = Waveform::new(samples, SAMPLE_RATE);

    // A half-tone boundary frame carries about half the windowed energy of a
    // full-tone frame, so 0.6 keeps boundary frames out of the speech run.
    let extractor = SpeechExtractor::new(energy_only_config(0.6)).expect("valid config");
    let extraction = extractor.run(&waveform).expect("run succeeds");

    assert_eq!(
        extraction.segments.len(),
        1,
        "segments: {:?}",
        extraction.segments
    );
    let segment = extraction.segments[0];
    // The confirmed region starts one frame before the first full-tone frame
    // and the frame-to-sample coefficient is half a frame length, so the
    // boundaries land within a frame of the true tone edges.
    assert!(
        (15_600..=16_560).contains(&segment.start),
        "segment start {}",
        segment.start
    );
    assert!(
        (30_000..=32_560).contains(&segment.end),
        "segment end {}",
        segment.end
    );
    assert_eq!(extraction.speech.len(), segment.len());
    assert_eq!(extraction.speech.sample_rate, SAMPLE_RATE);

    // Hysteresis never commits a run shorter than its confirmation length.
    let mut run = 1usize;
    for i in 1..extraction.mask.len() {
        if extraction.mask[i] == extraction.mask[i - 1] {
            run += 1;
        } else {
            assert!(run >= 7, "mask run of length {run} ending at frame {i}");
            run = 1;
        }
    }
}

#[test]
fn tone_burst_reports_pipeline_events_in_order() {
    let mut samples = vec![0.0f32; 16_080];
    samples.extend(tone(440.0, 0.5, 16_000));
    samples.extend(std::iter::repeat(0.0).take(15_920));
    let waveform = Waveform::new(samples, SAMPLE_RATE);

    let mut observer = RecordingObserver::default();
    let extractor = SpeechExtractor::new(energy_only_config(0.6)).expect("valid config");
    extractor
        .run_with_observer(&waveform, &mut observer)
        .expect("run succeeds");
    let events = observer.events;

    assert!(matches!(
        events.first(),
        Some(PipelineEvent::DescriptorsComputed { num_frames }) if *num_frames > 0
    ));
    assert!(matches!(
        events.get(1),
        Some(PipelineEvent::BaselinesEstimated { leading_frames: 31, .. })
    ));
    // One speech confirmation, one silence confirmation, then the summary.
    let confirmations: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::StateConfirmed { speech, .. } => Some(*speech),
            _ => None,
        })
        .collect();
    assert_eq!(confirmations, vec![true, false]);
    assert!(matches!(
        events.last(),
        Some(PipelineEvent::SegmentsExtracted { segments: 1, .. })
    ));
}

#[test]
fn short_burst_below_run_length_is_ignored() {
    // A 5-frame burst never reaches the 7-frame confirmation threshold.
    let mut samples = vec![0.0f32; 16_080];
    samples.extend(tone(440.0, 0.5, 5 * 240));
    samples.extend(std::iter::repeat(0.0).take(30_720));
    let waveform = Waveform::new(samples, SAMPLE_RATE);

    let extractor = SpeechExtractor::new(energy_only_config(0.6)).expect("valid config");
    let extraction = extractor.run(&waveform).expect("run succeeds");
    assert!(extraction.segments.is_empty(), "{:?}", extraction.segments);
}

#[test]
fn degenerate_overlap_is_rejected_at_construction() {
    let config = VadConfig {
        frame_length_sec: 0.03,
        frame_overlap_sec: 0.03,
        ..VadConfig::default()
    };
    let err = SpeechExtractor::new(config).unwrap_err();
    assert!(matches!(err, VadcutError::InvalidConfiguration(_)));
}
