use sleeptrack_types::{
    AccelSample, ClassificationRecord, HeartRateSample, SensorEvent, Stage, Thresholds,
};

use crate::{
    Admission, ConfigError, PipelineConfig, SignalConditioner, StageClassifier,
    ThresholdCalibrator,
};

/// Result of one classification tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub record: ClassificationRecord,
    /// Set while either channel is still waiting for its first sample; the
    /// record is then a placeholder Awake and the classifier did not run.
    pub provisional: bool,
}

/// Owns all mutable tracking state: per-channel smoothing, the sample
/// accumulator, the adaptive thresholds and the classifier's last stage.
///
/// Every entry point runs to completion on `&mut self`, so callers only have
/// to make sure a single task drives it.
pub struct ClassificationPipeline {
    config: PipelineConfig,
    conditioner: SignalConditioner,
    calibrator: ThresholdCalibrator,
    classifier: StageClassifier,
}

impl ClassificationPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            conditioner: SignalConditioner::new(&config),
            calibrator: ThresholdCalibrator::new(
                config.initial_thresholds(),
                config.threshold_multiplier,
            ),
            classifier: StageClassifier::new(),
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn on_event(&mut self, event: SensorEvent) {
        match event {
            SensorEvent::HeartRate(sample) => {
                self.on_heart_rate(sample);
            }
            SensorEvent::Accel(sample) => {
                self.on_acceleration(sample);
            }
        }
    }

    pub fn on_heart_rate(&mut self, sample: HeartRateSample) -> Admission {
        self.conditioner.on_heart_rate(sample)
    }

    pub fn on_acceleration(&mut self, sample: AccelSample) -> Option<f64> {
        self.conditioner.on_acceleration(sample)
    }

    pub fn tick(&mut self, timestamp: i64) -> TickOutcome {
        let heart_rate = self.conditioner.heart_rate().smoothed();
        let motion = self.conditioner.motion().smoothed();

        if !self.conditioner.is_ready() {
            return TickOutcome {
                record: ClassificationRecord::new(timestamp, heart_rate, motion, Stage::Awake),
                provisional: true,
            };
        }

        let stage = self
            .classifier
            .classify(heart_rate, motion, self.calibrator.thresholds());

        TickOutcome {
            record: ClassificationRecord::new(timestamp, heart_rate, motion, stage),
            provisional: false,
        }
    }

    pub fn calibrate(&mut self) -> Thresholds {
        self.calibrator.calibrate(self.conditioner.accumulator_mut())
    }

    pub fn thresholds(&self) -> Thresholds {
        self.calibrator.thresholds()
    }

    pub fn last_stage(&self) -> Stage {
        self.classifier.last_stage()
    }

    pub fn is_ready(&self) -> bool {
        self.conditioner.is_ready()
    }

    pub fn conditioner(&self) -> &SignalConditioner {
        &self.conditioner
    }
}
