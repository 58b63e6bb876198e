use crate::detector::DetectorConfig;
use anyhow::Context;
use knuffel::Decode;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DEVICE_ID: &str = "quakewatch-1";

/// On-disk configuration (`config.kdl`). Every property is optional; missing
/// ones fall back to [`DetectorConfig::default`].
#[derive(Decode, Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuakeConfig {
    #[knuffel(child)]
    pub detector: Option<DetectorSection>,
    #[knuffel(child)]
    pub device: Option<DeviceSection>,
    #[knuffel(child)]
    pub sinks: Option<SinkSection>,
}

#[derive(Decode, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorSection {
    #[knuffel(property)]
    pub window_size: Option<usize>,
    #[knuffel(property)]
    pub sampling_rate: Option<f32>,
    #[knuffel(property)]
    pub band_low: Option<f32>,
    #[knuffel(property)]
    pub band_high: Option<f32>,
    #[knuffel(property)]
    pub energy_threshold: Option<f32>,
    #[knuffel(property)]
    pub variance_threshold: Option<f32>,
    #[knuffel(property)]
    pub peak_threshold: Option<u32>,
    #[knuffel(property)]
    pub peak_amplitude: Option<f32>,
    #[knuffel(property)]
    pub peak_spacing: Option<usize>,
    #[knuffel(property)]
    pub required_streak: Option<u32>,
    #[knuffel(property)]
    pub min_detection_ms: Option<u64>,
    #[knuffel(property)]
    pub evaluation_stride: Option<u32>,
}

#[derive(Decode, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSection {
    #[knuffel(property)]
    pub id: Option<String>,
}

#[derive(Decode, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkSection {
    #[knuffel(property)]
    pub log: Option<bool>,
    #[knuffel(property)]
    pub store: Option<bool>,
}

impl QuakeConfig {
    pub fn parse(name: &str, content: &str) -> anyhow::Result<Self> {
        let config = knuffel::parse(name, content)?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse("config.kdl", &content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!("Loading config from {}", path.display());
            Self::load(path)
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn detector_config(&self) -> DetectorConfig {
        let mut config = DetectorConfig::default();
        let Some(d) = &self.detector else {
            return config;
        };
        if let Some(v) = d.window_size {
            config.window_size = v;
        }
        if let Some(v) = d.sampling_rate {
            config.sampling_rate_hz = v;
        }
        if let Some(v) = d.band_low {
            config.band_low_hz = v;
        }
        if let Some(v) = d.band_high {
            config.band_high_hz = v;
        }
        if let Some(v) = d.energy_threshold {
            config.energy_threshold = v;
        }
        if let Some(v) = d.variance_threshold {
            config.variance_threshold = v;
        }
        if let Some(v) = d.peak_threshold {
            config.peak_threshold = v;
        }
        if let Some(v) = d.peak_amplitude {
            config.peak_amplitude = v;
        }
        if let Some(v) = d.peak_spacing {
            config.peak_spacing = v;
        }
        if let Some(v) = d.required_streak {
            config.required_streak = v;
        }
        if let Some(v) = d.min_detection_ms {
            config.min_detection_ms = v;
        }
        if let Some(v) = d.evaluation_stride {
            config.evaluation_stride = v;
        }
        config
    }

    pub fn device_id(&self) -> String {
        self.device
            .as_ref()
            .and_then(|d| d.id.clone())
            .unwrap_or_else(|| DEFAULT_DEVICE_ID.to_string())
    }

    pub fn log_enabled(&self) -> bool {
        self.sinks.as_ref().and_then(|s| s.log).unwrap_or(true)
    }

    pub fn store_enabled(&self) -> bool {
        self.sinks.as_ref().and_then(|s| s.store).unwrap_or(true)
    }
}
