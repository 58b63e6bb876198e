use thiserror::Error;

/// Rejected detector configuration. Raised by `Detector::configure` so that
/// bad parameters never reach the filters as NaN or infinity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window size must be at least 1")]
    EmptyWindow,

    #[error("sampling rate must be positive and finite, got {0}")]
    InvalidSamplingRate(f32),

    #[error("band edges must be positive and finite, got {low}..{high} Hz")]
    InvalidBand { low: f32, high: f32 },

    #[error("band low edge {low} Hz must be below high edge {high} Hz")]
    InvertedBand { low: f32, high: f32 },

    #[error("cutoff {cutoff} Hz is at or above the Nyquist frequency {nyquist} Hz")]
    AboveNyquist { cutoff: f32, nyquist: f32 },

    #[error("{name} must be finite, got {value}")]
    NonFiniteThreshold { name: &'static str, value: f32 },

    #[error("evaluation stride must be at least 1")]
    ZeroStride,
}
