use crate::confirmation::DetectionSignal;
use crate::detector::{Detector, DetectorConfig};
use crate::dispatch::{SinkHandle, SinkMessage};
use crate::event::{DetectionEvent, StatusUpdate};
use crate::location::LocationReader;
use crate::recording::RawSample;
use anyhow::Result;
use log::info;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub samples: u64,
    pub evaluations: u64,
    pub confirmations: u64,
}

/// A detection session: "detection enabled" from start to finish.
///
/// Wires the detector to its collaborators. Every side effect leaves through
/// the sink handle; the location feed is only ever read.
pub struct DetectionSession {
    detector: Detector,
    sinks: SinkHandle,
    location: LocationReader,
    forward_samples: bool,
    device_id: String,
    last_status: Option<String>,
    summary: SessionSummary,
}

impl DetectionSession {
    pub fn start(
        config: DetectorConfig,
        sinks: SinkHandle,
        location: LocationReader,
        device_id: impl Into<String>,
    ) -> Result<Self> {
        let detector = Detector::configure(config)?;
        let device_id = device_id.into();
        info!("Detection started for {}", device_id);
        Ok(Self {
            detector,
            sinks,
            location,
            forward_samples: false,
            device_id,
            last_status: None,
            summary: SessionSummary::default(),
        })
    }

    /// Also hands every raw sample to the sinks, for recording.
    pub fn with_sample_feed(mut self) -> Self {
        self.forward_samples = true;
        self
    }

    pub fn process(&mut self, sample: &RawSample) -> Option<DetectionSignal> {
        if self.forward_samples {
            self.sinks.send(SinkMessage::Sample(*sample));
        }
        self.summary.samples += 1;

        let evaluation = self.detector.on_sample(sample.magnitude(), sample.timestamp_ms);
        if evaluation.features.is_some() {
            self.summary.evaluations += 1;
        }

        if let Some(signal) = evaluation.signal {
            if let (DetectionSignal::Confirmed, Some(features)) = (signal, evaluation.features) {
                self.summary.confirmations += 1;
                let event = DetectionEvent::new(
                    sample.timestamp_ms,
                    &features,
                    self.location.snapshot(),
                    &self.device_id,
                );
                self.sinks.send(SinkMessage::Detection(event));
            }
            self.publish_status(signal, sample.timestamp_ms);
        }
        evaluation.signal
    }

    /// Only changes of the visible status line reach the sinks.
    fn publish_status(&mut self, signal: DetectionSignal, timestamp: u64) {
        let line = signal.status_line();
        if self.last_status.as_deref() == Some(line.as_str()) {
            return;
        }
        self.last_status = Some(line);
        self.sinks
            .send(SinkMessage::Status(StatusUpdate { timestamp, signal }));
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Window and debounce state are discarded.
    pub fn finish(self) -> SessionSummary {
        info!(
            "Detection stopped: {} samples, {} windows evaluated, {} confirmations",
            self.summary.samples, self.summary.evaluations, self.summary.confirmations
        );
        self.summary
    }
}
