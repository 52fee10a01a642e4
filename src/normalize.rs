//! Min-max rescaling of descriptor series.

/// Rescale `series` to the closed interval [0, 1].
///
/// Applied per descriptor series, never across descriptors. A constant
/// (or empty) series has no span to scale over and maps to all zeros.
pub fn min_max(series: &[f32]) -> Vec<f32> {
    let Some(&first) = series.first() else {
        return Vec::new();
    };
    let (min, max) = series.iter().fold((first, first), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    let span = max - min;
    if span <= 0.0 {
        return vec![0.0; series.len()];
    }
    series.iter().map(|&v| (v - min) / span).collect()
}
