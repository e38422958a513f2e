use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::Args;
use sleeptrack_algos::PipelineConfig;

/// Pipeline tunables. Flags override values loaded from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// JSON file with a full or partial pipeline configuration
    #[arg(long, env = "SLEEPTRACK_CONFIG")]
    pub config: Option<PathBuf>,
    /// Admit heart-rate samples only above this confidence (50 lenient, 80 strict)
    #[arg(long, env)]
    pub hr_confidence_gate: Option<u8>,
    #[arg(long, env)]
    pub initial_hr_threshold: Option<f64>,
    #[arg(long, env)]
    pub initial_motion_threshold: Option<f64>,
    #[arg(long, env)]
    pub calibration_interval_secs: Option<u64>,
    #[arg(long, env)]
    pub accel_poll_ms: Option<u64>,
    /// Run one calibration as soon as tracking starts
    #[arg(long, env)]
    pub calibrate_on_start: bool,
    /// Show raw bpm before confidence gating (bypasses smoothing)
    #[arg(long, env)]
    pub raw_hr_passthrough: bool,
}

impl PipelineArgs {
    pub fn into_config(self) -> anyhow::Result<PipelineConfig> {
        let mut config = match self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("Reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Parsing config {}", path.display()))?
            }
            None => PipelineConfig::default(),
        };

        if let Some(gate) = self.hr_confidence_gate {
            config.hr_confidence_gate = gate;
        }
        if let Some(threshold) = self.initial_hr_threshold {
            config.initial_hr_threshold = threshold;
        }
        if let Some(threshold) = self.initial_motion_threshold {
            config.initial_motion_threshold = threshold;
        }
        if let Some(secs) = self.calibration_interval_secs {
            config.calibration_interval = Duration::from_secs(secs);
        }
        if let Some(ms) = self.accel_poll_ms {
            config.accel_poll_interval = Duration::from_millis(ms);
        }
        config.calibrate_on_start |= self.calibrate_on_start;
        config.raw_hr_passthrough |= self.raw_hr_passthrough;

        config.validate()?;
        Ok(config)
    }
}
