use crate::classifier::Classifier;
use crate::confirmation::{ConfirmationEngine, ConfirmationState, DetectionSignal};
use crate::error::ConfigError;
use crate::features::{FeatureExtractor, WindowFeatures};
use crate::filter::{remove_mean, FilterPipeline};
use crate::window::SampleWindow;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub window_size: usize,
    pub sampling_rate_hz: f32,
    pub band_low_hz: f32,
    pub band_high_hz: f32,
    pub energy_threshold: f32,
    pub variance_threshold: f32,
    pub peak_threshold: u32,
    pub peak_amplitude: f32,
    pub peak_spacing: usize,
    pub required_streak: u32,
    pub min_detection_ms: u64,
    /// Evaluate every n-th sample once the window is full.
    pub evaluation_stride: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 128,
            sampling_rate_hz: 50.0,
            band_low_hz: 1.0,
            band_high_hz: 10.0,
            energy_threshold: 0.5,
            variance_threshold: 0.07,
            peak_threshold: 7,
            peak_amplitude: 0.4,
            peak_spacing: 10,
            required_streak: 10,
            min_detection_ms: 3000,
            evaluation_stride: 1,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        let fs = self.sampling_rate_hz;
        if !(fs.is_finite() && fs > 0.0) {
            return Err(ConfigError::InvalidSamplingRate(fs));
        }
        let (low, high) = (self.band_low_hz, self.band_high_hz);
        if !(low.is_finite() && high.is_finite() && low > 0.0 && high > 0.0) {
            return Err(ConfigError::InvalidBand { low, high });
        }
        if low >= high {
            return Err(ConfigError::InvertedBand { low, high });
        }
        let nyquist = fs / 2.0;
        if high >= nyquist {
            return Err(ConfigError::AboveNyquist { cutoff: high, nyquist });
        }
        for (name, value) in [
            ("energy threshold", self.energy_threshold),
            ("variance threshold", self.variance_threshold),
            ("peak amplitude", self.peak_amplitude),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteThreshold { name, value });
            }
        }
        if self.evaluation_stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// `None` when latched and still positive, or skipped by the stride.
    pub signal: Option<DetectionSignal>,
    pub features: Option<WindowFeatures>,
}

impl Evaluation {
    fn idle() -> Self {
        Self {
            signal: Some(DetectionSignal::Monitoring),
            features: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Detector {
    config: DetectorConfig,
    window: SampleWindow,
    pipeline: FilterPipeline,
    extractor: FeatureExtractor,
    classifier: Classifier,
    engine: ConfirmationEngine,
    centered: Vec<f32>,
    scratch: Vec<f32>,
    filtered: Vec<f32>,
}

impl Detector {
    pub fn configure(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let n = config.window_size;
        Ok(Self {
            window: SampleWindow::new(n),
            pipeline: FilterPipeline::new(config.band_low_hz, config.band_high_hz, config.sampling_rate_hz),
            extractor: FeatureExtractor::new(config.peak_amplitude, config.peak_spacing),
            classifier: Classifier::new(config.energy_threshold, config.variance_threshold, config.peak_threshold),
            engine: ConfirmationEngine::new(config.required_streak, config.min_detection_ms),
            centered: vec![0.0; n],
            scratch: vec![0.0; n],
            filtered: vec![0.0; n],
            config,
        })
    }

    pub fn on_sample(&mut self, magnitude: f32, timestamp_ms: u64) -> Evaluation {
        self.window.ingest(magnitude);
        if !self.window.is_full() {
            return Evaluation::idle();
        }

        let since_full = self.window.ingested() - self.window.capacity() as u64;
        if since_full % self.config.evaluation_stride as u64 != 0 {
            return Evaluation {
                signal: None,
                features: None,
            };
        }

        let features = self.evaluate_window();
        let positive = self.classifier.classify(&features);
        debug!(
            "t={}ms energy={:.4} variance={:.4} peaks={} positive={}",
            timestamp_ms, features.energy, features.variance, features.peak_count, positive
        );

        Evaluation {
            signal: self.engine.observe(positive, timestamp_ms),
            features: Some(features),
        }
    }

    fn evaluate_window(&mut self) -> WindowFeatures {
        self.window.snapshot_into(&mut self.centered);
        remove_mean(&mut self.centered);
        self.pipeline
            .band_pass_into(&self.centered, &mut self.scratch, &mut self.filtered);
        self.extractor.extract(&self.filtered)
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.engine.reset();
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn confirmation(&self) -> ConfirmationState {
        self.engine.state()
    }

    pub fn is_warmed_up(&self) -> bool {
        self.window.is_full()
    }
}
