use std::time::Duration;

use sleeptrack_types::Thresholds;
use thiserror::Error;

use crate::{ExponentialFilter, SlidingWindow, ThresholdCalibrator};

/// Tunables for the conditioning and classification pipeline.
///
/// Defaults reproduce the watch behaviour; several of them (the confidence
/// gate, the initial heart-rate threshold, the raw pass-through and the
/// startup calibration) differed between firmware revisions and are exposed
/// here instead of being hard coded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub alpha: f64,
    pub window_size: usize,
    /// Heart-rate samples are admitted only when confidence is strictly
    /// greater than this. A stricter gate (e.g. 80) drops more noisy samples
    /// but the smoothed value reacts later.
    pub hr_confidence_gate: u8,
    /// Publish every raw bpm as the current heart rate before the confidence
    /// gate runs. Leaks unsmoothed values into the output; off by default.
    pub raw_hr_passthrough: bool,
    pub initial_hr_threshold: f64,
    pub initial_motion_threshold: f64,
    pub threshold_multiplier: f64,
    /// Run one calibration immediately when tracking starts.
    pub calibrate_on_start: bool,
    pub tick_interval: Duration,
    pub calibration_interval: Duration,
    pub accel_poll_interval: Duration,
    pub history_capacity: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("alpha must be within [0, 1], got {0}")]
    InvalidAlpha(f64),
    #[error("window size must be at least 1")]
    EmptyWindow,
    #[error("confidence gate {0} would reject every heart-rate sample")]
    InvalidConfidenceGate(u8),
    #[error("{name} threshold must be finite and non-negative, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("threshold multiplier must be finite and positive, got {0}")]
    InvalidMultiplier(f64),
    #[error("{name} interval must lie within 1 ms and 24 h, got {interval:?}")]
    IntervalOutOfRange {
        name: &'static str,
        interval: Duration,
    },
    #[error("history capacity must be at least 1")]
    EmptyHistory,
}

impl PipelineConfig {
    pub const DEFAULT_CONFIDENCE_GATE: u8 = 50;
    pub const MAX_CONFIDENCE: u8 = 100;
    /// Scheduling runs on whole milliseconds.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);
    pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        if self.window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if self.hr_confidence_gate >= Self::MAX_CONFIDENCE {
            return Err(ConfigError::InvalidConfidenceGate(self.hr_confidence_gate));
        }
        for (name, value) in [
            ("heart rate", self.initial_hr_threshold),
            ("motion", self.initial_motion_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        if !self.threshold_multiplier.is_finite() || self.threshold_multiplier <= 0.0 {
            return Err(ConfigError::InvalidMultiplier(self.threshold_multiplier));
        }
        for (name, interval) in [
            ("tick", self.tick_interval),
            ("calibration", self.calibration_interval),
            ("accelerometer poll", self.accel_poll_interval),
        ] {
            if !(Self::MIN_INTERVAL..=Self::MAX_INTERVAL).contains(&interval) {
                return Err(ConfigError::IntervalOutOfRange { name, interval });
            }
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        Ok(())
    }

    pub fn initial_thresholds(&self) -> Thresholds {
        Thresholds::new(self.initial_hr_threshold, self.initial_motion_threshold)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            alpha: ExponentialFilter::DEFAULT_ALPHA,
            window_size: SlidingWindow::DEFAULT_CAPACITY,
            hr_confidence_gate: Self::DEFAULT_CONFIDENCE_GATE,
            raw_hr_passthrough: false,
            initial_hr_threshold: Thresholds::DEFAULT_HEART_RATE,
            initial_motion_threshold: Thresholds::DEFAULT_MOTION,
            threshold_multiplier: ThresholdCalibrator::DEFAULT_MULTIPLIER,
            calibrate_on_start: false,
            tick_interval: Duration::from_secs(1),
            calibration_interval: Duration::from_secs(60),
            accel_poll_interval: Duration::from_millis(200),
            history_capacity: crate::SleepHistory::DEFAULT_CAPACITY,
        }
    }
}
