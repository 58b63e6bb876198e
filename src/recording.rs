use crate::util::magnitude;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// One accelerometer reading as recorded on the phone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    #[serde(rename = "Timestamp")]
    pub timestamp_ms: u64,
    #[serde(rename = "X")]
    pub x: f32,
    #[serde(rename = "Y")]
    pub y: f32,
    #[serde(rename = "Z")]
    pub z: f32,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

impl RawSample {
    pub fn magnitude(&self) -> f32 {
        magnitude(self.x, self.y, self.z)
    }
}

pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<RawSample>> {
    let path = path.as_ref();
    info!("Loading samples from {}", path.display());

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open sample trace: {}", path.display()))?;

    let mut samples = Vec::new();
    for (line, row) in reader.deserialize::<RawSample>().enumerate() {
        // +2: header row and 1-based numbering
        let sample = row.with_context(|| format!("Malformed sample on line {}", line + 2))?;
        samples.push(sample);
    }

    info!("Loaded {} samples", samples.len());
    Ok(samples)
}

/// Appends raw samples to a CSV trace. The header is written only when the
/// file starts out empty.
pub struct SampleRecorder {
    writer: csv::Writer<File>,
    written: u64,
}

impl SampleRecorder {
    /// Appends to an existing trace.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path.as_ref(), false)
    }

    /// Starts a fresh trace, truncating any existing file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path.as_ref(), true)
    }

    fn open_with(path: &Path, truncate: bool) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut options = OpenOptions::new();
        if truncate {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        let file = options
            .create(true)
            .open(path)
            .with_context(|| format!("Failed to open recording: {}", path.display()))?;
        let needs_header = file.metadata()?.len() == 0;
        debug!("Recording to {} (header: {})", path.display(), needs_header);

        let writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        Ok(Self { writer, written: 0 })
    }

    pub fn record(&mut self, sample: &RawSample) -> Result<()> {
        self.writer.serialize(sample)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        info!("Recorded {} samples", self.written);
        Ok(())
    }
}

pub fn save_samples<P: AsRef<Path>>(path: P, samples: &[RawSample]) -> Result<()> {
    let path = path.as_ref();
    info!("Saving {} samples to {}", samples.len(), path.display());
    let mut recorder = SampleRecorder::create(path)?;
    for sample in samples {
        recorder.record(sample)?;
    }
    recorder.close()
}
