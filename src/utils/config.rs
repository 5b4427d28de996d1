//! Configuration and constants for the profiler.

use crate::utils::error::ConfigError;

/// Number of sampled averages kept per history record
pub const HISTORY_SIZE: usize = 50;

/// Default sampling window in seconds
pub const DEFAULT_SAMPLE_RATE: f64 = 0.5;

/// Current snapshot schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Upper bound of the history plot, in milliseconds
pub const PLOT_MAX_MS: f64 = 25.0;

/// Frame budget at 60 Hz, shown next to the FPS counter
pub const VSYNC_FRAME_MS: f64 = 16.66;

/// Runtime configuration of a profiler instance
///
/// **Public** - built by the binary from CLI flags or by embedding code
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilerConfig {
    /// Seconds of wall time per sampling window
    pub sample_rate: f64,

    /// Whether the overlay starts visible
    pub shown: bool,

    /// Whether the frame-time window is enabled
    pub show_time: bool,

    /// Whether the log window is enabled
    pub show_log: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            shown: false,
            show_time: true,
            show_log: true,
        }
    }
}

impl ProfilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_shown(mut self, shown: bool) -> Self {
        self.shown = shown;
        self
    }

    pub fn with_show_time(mut self, show_time: bool) -> Self {
        self.show_time = show_time;
        self
    }

    pub fn with_show_log(mut self, show_log: bool) -> Self {
        self.show_log = show_log;
        self
    }

    /// Check that the configuration can drive a sampler
    ///
    /// # Errors
    /// * `ConfigError::InvalidSampleRate` - rate is zero, negative or not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        Ok(())
    }
}
