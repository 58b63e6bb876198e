use crate::features::WindowFeatures;

/// Threshold rule over [`WindowFeatures`]. Energy and variance compare
/// strictly, peak count inclusively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    pub energy_threshold: f32,
    pub variance_threshold: f32,
    pub peak_threshold: u32,
}

impl Classifier {
    pub fn new(energy_threshold: f32, variance_threshold: f32, peak_threshold: u32) -> Self {
        Self {
            energy_threshold,
            variance_threshold,
            peak_threshold,
        }
    }

    pub fn classify(&self, features: &WindowFeatures) -> bool {
        features.energy > self.energy_threshold
            && features.variance > self.variance_threshold
            && features.peak_count >= self.peak_threshold
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(0.5, 0.07, 7)
    }
}
