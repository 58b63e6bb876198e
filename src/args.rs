use crate::detector::DetectorConfig;
use crate::util::{duration_ms_parser, non_negative_parser, positive_parser};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Accelerometer quake detector: band-pass features, thresholds and debounce.")]
pub struct Cli {
    /// Config file (defaults to config.kdl in the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a recorded trace through a detection session
    Replay(ReplayArgs),
    /// Write a synthetic trace: rest, shake, rest
    Simulate(SimulateArgs),
    /// List stored detections, newest first
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Print the effective configuration as JSON
    Config,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// CSV trace with Timestamp,X,Y,Z,Latitude,Longitude columns
    pub input: PathBuf,
    /// Append every replayed sample to this CSV trace
    #[arg(long)]
    pub record: Option<PathBuf>,
    /// Write confirmed detections as JSON lines
    #[arg(long)]
    pub report: Option<PathBuf>,
    #[arg(long)]
    pub device_id: Option<String>,
    /// Do not save detections to the history database
    #[arg(long)]
    pub no_store: bool,
    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Overrides applied on top of the config file.
#[derive(Args, Default)]
pub struct TuningArgs {
    #[arg(long, value_parser = non_negative_parser)]
    pub energy_threshold: Option<f32>,
    #[arg(long, value_parser = non_negative_parser)]
    pub variance_threshold: Option<f32>,
    #[arg(long)]
    pub peak_threshold: Option<u32>,
    #[arg(long)]
    pub required_streak: Option<u32>,
    /// Minimum duration of a positive run, e.g. 3000, 3000ms or 3s
    #[arg(long, value_parser = duration_ms_parser)]
    pub min_detection: Option<u64>,
    #[arg(long)]
    pub stride: Option<u32>,
}

impl TuningArgs {
    pub fn apply(&self, config: &mut DetectorConfig) {
        if let Some(v) = self.energy_threshold {
            config.energy_threshold = v;
        }
        if let Some(v) = self.variance_threshold {
            config.variance_threshold = v;
        }
        if let Some(v) = self.peak_threshold {
            config.peak_threshold = v;
        }
        if let Some(v) = self.required_streak {
            config.required_streak = v;
        }
        if let Some(v) = self.min_detection {
            config.min_detection_ms = v;
        }
        if let Some(v) = self.stride {
            config.evaluation_stride = v;
        }
    }
}

#[derive(Args)]
pub struct SimulateArgs {
    pub output: PathBuf,
    #[arg(long, default_value_t = 5.0, value_parser = non_negative_parser)]
    pub seconds: f32,
    #[arg(long, default_value_t = 3.0, value_parser = non_negative_parser)]
    pub rest_seconds: f32,
    #[arg(long, default_value_t = 5.0, value_parser = positive_parser)]
    pub frequency: f32,
    #[arg(long, default_value_t = 2.0, value_parser = non_negative_parser)]
    pub amplitude: f32,
    #[arg(long, default_value_t = 0.02, value_parser = non_negative_parser)]
    pub noise: f32,
    #[arg(long, default_value_t = 50.0, value_parser = positive_parser)]
    pub rate: f32,
    #[arg(long, default_value_t = 7)]
    pub seed: u64,
    /// Fix reported on every sample
    #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
    pub location: Option<Vec<f64>>,
}
