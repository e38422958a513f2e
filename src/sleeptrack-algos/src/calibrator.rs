use sleeptrack_types::Thresholds;

use crate::{conditioner::SampleAccumulator, helpers::stats::mean};

/// Re-derives the stage thresholds from the wearer's own recent baseline.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdCalibrator {
    thresholds: Thresholds,
    multiplier: f64,
}

impl ThresholdCalibrator {
    pub const DEFAULT_MULTIPLIER: f64 = 1.2;

    pub fn new(initial: Thresholds, multiplier: f64) -> Self {
        Self {
            thresholds: initial,
            multiplier,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// `multiplier * mean` per channel; an empty channel keeps its current
    /// threshold. Results are clamped at zero.
    pub fn recalibrate(
        heart_rate: &[f64],
        motion: &[f64],
        current: Thresholds,
        multiplier: f64,
    ) -> Thresholds {
        Thresholds {
            heart_rate: Self::scaled_mean(heart_rate, multiplier).unwrap_or(current.heart_rate),
            motion: Self::scaled_mean(motion, multiplier).unwrap_or(current.motion),
        }
    }

    /// Consumes the accumulated snapshot. Both channels are empty afterwards,
    /// whether or not they contributed.
    pub fn calibrate(&mut self, accumulator: &mut SampleAccumulator) -> Thresholds {
        let snapshot = accumulator.take();
        self.thresholds = Self::recalibrate(
            snapshot.heart_rate(),
            snapshot.motion(),
            self.thresholds,
            self.multiplier,
        );
        self.thresholds
    }

    fn scaled_mean(values: &[f64], multiplier: f64) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some((mean(values) * multiplier).max(0.0))
    }
}

impl Default for ThresholdCalibrator {
    fn default() -> Self {
        Self::new(Thresholds::default(), Self::DEFAULT_MULTIPLIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PipelineConfig, SignalConditioner};
    use sleeptrack_types::{AccelSample, HeartRateSample};

    #[test]
    fn heart_rate_threshold_is_scaled_mean() {
        let t = ThresholdCalibrator::recalibrate(&[50.0, 50.0, 50.0], &[], Thresholds::default(), 1.2);
        assert_eq!(t.heart_rate, 60.0);
    }

    #[test]
    fn empty_channels_keep_previous_bits() {
        let current = Thresholds::new(47.123_456_789, 0.173_205_08);
        let t = ThresholdCalibrator::recalibrate(&[], &[], current, 1.2);
        assert_eq!(t.heart_rate.to_bits(), current.heart_rate.to_bits());
        assert_eq!(t.motion.to_bits(), current.motion.to_bits());
    }

    #[test]
    fn channels_update_independently() {
        let current = Thresholds::new(10.0, 0.2);
        let t = ThresholdCalibrator::recalibrate(&[], &[0.5, 1.5], current, 1.2);
        assert_eq!(t.heart_rate, 10.0);
        assert!((t.motion - 1.2).abs() < 1e-12);
    }

    #[test]
    fn negative_baseline_clamps_to_zero() {
        let t = ThresholdCalibrator::recalibrate(&[], &[-0.05, -0.02], Thresholds::default(), 1.2);
        assert_eq!(t.motion, 0.0);
    }

    #[test]
    fn calibrate_always_clears_accumulator() {
        let mut conditioner = SignalConditioner::new(&PipelineConfig::default());
        conditioner.on_acceleration(AccelSample::new(0.0, 0.0, 1.5));
        assert!(conditioner.accumulator().heart_rate().is_empty());

        let mut calibrator = ThresholdCalibrator::default();
        let t = calibrator.calibrate(conditioner.accumulator_mut());
        assert!(conditioner.accumulator().is_empty());
        assert_eq!(t.heart_rate, Thresholds::DEFAULT_HEART_RATE);
        assert!(t.motion > 0.0);
        assert_eq!(calibrator.thresholds(), t);

        // Nothing collected since: thresholds stay put.
        let again = calibrator.calibrate(conditioner.accumulator_mut());
        assert_eq!(again, t);
        assert!(conditioner.accumulator().is_empty());
    }

    #[test]
    fn calibrate_uses_filtered_heart_rate() {
        let mut conditioner = SignalConditioner::new(&PipelineConfig::default());
        conditioner.on_heart_rate(HeartRateSample::new(100.0, 99));
        let filtered = conditioner.heart_rate().last_filtered();

        let mut calibrator = ThresholdCalibrator::default();
        let t = calibrator.calibrate(conditioner.accumulator_mut());
        assert!((t.heart_rate - filtered * 1.2).abs() < 1e-12);
    }
}
