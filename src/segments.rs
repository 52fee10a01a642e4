//! Conversion of the speech mask into contiguous waveform segments.

/// A half-open range of sample indices classified as speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    pub start: usize,
    pub end: usize,
}

impl SegmentRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Frame indices `i` where `mask[i] != mask[i + 1]`.
pub fn mask_edges(mask: &[bool]) -> Vec<usize> {
    mask.windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(i, _)| i)
        .collect()
}

/// Convert mask edges into sample ranges, two edges per segment.
///
/// The frame-to-sample coefficient is `frame_length_sec * sample_rate / 2`;
/// the halving matches the 50%-overlap frame step the framer uses by
/// default, and the two must stay coupled or segment boundaries drift.
/// An unpaired trailing edge is dropped silently. Offsets are clamped to
/// the signal length so tail padding never produces out-of-range indices.
pub fn segment_ranges(
    edges: &[usize],
    frame_length_sec: f64,
    sample_rate: u32,
    signal_len: usize,
) -> Vec<SegmentRange> {
    let coefficient = frame_length_sec * f64::from(sample_rate) / 2.0;
    edges
        .chunks_exact(2)
        .filter_map(|pair| {
            let start = ((pair[0] as f64 * coefficient) as usize).min(signal_len);
            let end = ((pair[1] as f64 * coefficient) as usize).min(signal_len);
            (start < end).then_some(SegmentRange { start, end })
        })
        .collect()
}

/// Concatenate the sample ranges of `ranges` into an owned buffer, in
/// original time order.
pub fn extract(samples: &[f32], ranges: &[SegmentRange]) -> Vec<f32> {
    let total: usize = ranges.iter().map(SegmentRange::len).sum();
    let mut out = Vec::with_capacity(total);
    for range in ranges {
        out.extend_from_slice(&samples[range.start..range.end]);
    }
    out
}
