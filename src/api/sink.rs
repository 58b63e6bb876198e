use crate::api::db::DetectionStore;
use crate::event::{DetectionEvent, StatusUpdate};
use crate::recording::{RawSample, SampleRecorder};
use anyhow::Result;
use log::{info, warn};
use std::io::Write;

/// Consumer of detector output. Runs on the dispatcher worker, never on the
/// sample ingestion path.
pub trait DetectionSink: Send {
    fn name(&self) -> &str;

    fn on_sample(&mut self, _sample: &RawSample) -> Result<()> {
        Ok(())
    }

    fn on_status(&mut self, _status: &StatusUpdate) -> Result<()> {
        Ok(())
    }

    fn on_detection(&mut self, _event: &DetectionEvent) -> Result<()> {
        Ok(())
    }

    fn on_close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Status text and alerts through the `log` facade.
pub struct LogSink;

impl DetectionSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn on_status(&mut self, status: &StatusUpdate) -> Result<()> {
        info!("[{}] {}", status.timestamp, status.line());
        Ok(())
    }

    fn on_detection(&mut self, event: &DetectionEvent) -> Result<()> {
        warn!(
            "Earthquake detected! device={} lat={} lon={} energy={:.3} variance={:.3} peaks={}",
            event.device_id, event.latitude, event.longitude, event.energy, event.variance, event.peak_count
        );
        Ok(())
    }
}

/// One JSON object per confirmed detection, in the dashboard upload shape.
pub struct JsonReportSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonReportSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> DetectionSink for JsonReportSink<W> {
    fn name(&self) -> &str {
        "report"
    }

    fn on_detection(&mut self, event: &DetectionEvent) -> Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    fn on_close(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

pub struct StoreSink {
    store: DetectionStore,
}

impl StoreSink {
    pub fn new(store: DetectionStore) -> Self {
        Self { store }
    }
}

impl DetectionSink for StoreSink {
    fn name(&self) -> &str {
        "store"
    }

    fn on_detection(&mut self, event: &DetectionEvent) -> Result<()> {
        let id = self.store.insert(event)?;
        info!("Stored detection #{}", id);
        Ok(())
    }
}

/// Raw samples to a CSV trace.
pub struct RecorderSink {
    recorder: SampleRecorder,
}

impl RecorderSink {
    pub fn new(recorder: SampleRecorder) -> Self {
        Self { recorder }
    }
}

impl DetectionSink for RecorderSink {
    fn name(&self) -> &str {
        "recorder"
    }

    fn on_sample(&mut self, sample: &RawSample) -> Result<()> {
        self.recorder.record(sample)
    }

    fn on_close(&mut self) -> Result<()> {
        self.recorder.flush()?;
        info!("Recorded {} samples", self.recorder.written());
        Ok(())
    }
}
