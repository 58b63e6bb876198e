use crate::confirmation::DetectionSignal;
use crate::features::WindowFeatures;
use crate::location::Coordinates;
use serde::{Deserialize, Serialize};

/// Payload sent to sinks when a detection is confirmed.
///
/// Field names follow the dashboard's upload format (`peakCount`,
/// `deviceId`). An unknown location is reported as `0.0, 0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    pub timestamp: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub energy: f32,
    pub variance: f32,
    pub peak_count: u32,
    pub device_id: String,
}

impl DetectionEvent {
    pub fn new(
        timestamp: u64,
        features: &WindowFeatures,
        location: Option<Coordinates>,
        device_id: &str,
    ) -> Self {
        let location = location.unwrap_or_default();
        Self {
            timestamp,
            latitude: location.latitude,
            longitude: location.longitude,
            energy: features.energy,
            variance: features.variance,
            peak_count: features.peak_count,
            device_id: device_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub timestamp: u64,
    pub signal: DetectionSignal,
}

impl StatusUpdate {
    pub fn line(&self) -> String {
        self.signal.status_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let features = WindowFeatures {
            energy: 1.5,
            variance: 0.25,
            peak_count: 9,
        };
        let event = DetectionEvent::new(1_700_000_000_000, &features, None, "phone-1");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["peakCount"], 9);
        assert_eq!(json["deviceId"], "phone-1");
        assert_eq!(json["latitude"], 0.0);
        assert_eq!(json["timestamp"], 1_700_000_000_000u64);
    }

    #[test]
    fn test_location_payload() {
        let coords = Coordinates {
            latitude: 33.99,
            longitude: -6.85,
        };
        let event = DetectionEvent::new(0, &WindowFeatures::default(), Some(coords), "d");
        assert_eq!(event.latitude, 33.99);
        assert_eq!(event.longitude, -6.85);
    }
}
