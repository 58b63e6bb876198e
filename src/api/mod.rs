pub mod sink;
pub mod db;
pub mod config;

pub use sink::{DetectionSink, JsonReportSink, LogSink, RecorderSink, StoreSink};
pub use db::DetectionStore;
pub use config::QuakeConfig;
