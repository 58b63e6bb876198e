use serde::{Deserialize, Serialize};

/// Features of one filtered window. No memory across windows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowFeatures {
    pub energy: f32,
    pub variance: f32,
    pub peak_count: u32,
}

pub fn mean(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0f32;
    for &v in signal {
        sum += v;
    }
    sum / signal.len() as f32
}

pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0f32;
    for &v in signal {
        sum += v * v;
    }
    (sum / signal.len() as f32).sqrt()
}

/// Population variance.
pub fn variance(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let m = mean(signal);
    let mut acc = 0.0f32;
    for &v in signal {
        acc += (v - m) * (v - m);
    }
    acc / signal.len() as f32
}

/// Greedy left-to-right count of strict local maxima above `threshold` that
/// sit at least `min_spacing` samples after the previously accepted peak.
/// The first and last samples are never peaks.
pub fn count_spaced_peaks(signal: &[f32], threshold: f32, min_spacing: usize) -> u32 {
    let spacing = min_spacing as i64;
    let mut count = 0;
    let mut last_peak = -spacing;
    for i in 1..signal.len().saturating_sub(1) {
        let v = signal[i];
        if v > threshold && v > signal[i - 1] && v > signal[i + 1] && i as i64 - last_peak >= spacing {
            count += 1;
            last_peak = i as i64;
        }
    }
    count
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    pub peak_threshold: f32,
    pub peak_spacing: usize,
}

impl FeatureExtractor {
    pub fn new(peak_threshold: f32, peak_spacing: usize) -> Self {
        Self {
            peak_threshold,
            peak_spacing,
        }
    }

    pub fn extract(&self, filtered: &[f32]) -> WindowFeatures {
        WindowFeatures {
            energy: rms(filtered),
            variance: variance(filtered),
            peak_count: count_spaced_peaks(filtered, self.peak_threshold, self.peak_spacing),
        }
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(0.4, 10)
    }
}
