//! Real-time quake detection over a stream of accelerometer magnitudes.
//!
//! ```no_run
//! use quakewatch::{Detector, DetectorConfig, DetectionSignal};
//!
//! let mut detector = Detector::configure(DetectorConfig::default()).unwrap();
//! let evaluation = detector.on_sample(9.81, 0);
//! assert_eq!(evaluation.signal, Some(DetectionSignal::Monitoring));
//! ```

pub mod api;
pub mod args;
pub mod classifier;
pub mod confirmation;
pub mod detector;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod features;
pub mod filter;
pub mod location;
pub mod recording;
pub mod session;
pub mod simulate;
pub mod util;
pub mod window;

pub use classifier::Classifier;
pub use confirmation::{ConfirmationEngine, ConfirmationState, DetectionSignal};
pub use detector::{Detector, DetectorConfig, Evaluation};
pub use error::ConfigError;
pub use event::DetectionEvent;
pub use features::{FeatureExtractor, WindowFeatures};
pub use filter::FilterPipeline;
pub use window::SampleWindow;
