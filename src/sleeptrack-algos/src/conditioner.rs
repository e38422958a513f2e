use sleeptrack_types::{AccelSample, HeartRateSample};

use crate::{ExponentialFilter, PipelineConfig, SlidingWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected,
}

/// Filtered samples collected between two calibrations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleAccumulator {
    heart_rate: Vec<f64>,
    motion: Vec<f64>,
}

impl SampleAccumulator {
    pub fn heart_rate(&self) -> &[f64] {
        &self.heart_rate
    }

    pub fn motion(&self) -> &[f64] {
        &self.motion
    }

    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_empty() && self.motion.is_empty()
    }

    /// Hands over the complete snapshot and leaves both channels empty.
    pub fn take(&mut self) -> SampleAccumulator {
        std::mem::take(self)
    }
}

/// Two-stage smoothing for one sensor channel: exponential filter followed
/// by a sliding-window mean.
#[derive(Debug, Clone)]
pub struct Channel {
    filter: ExponentialFilter,
    window: SlidingWindow,
    smoothed: f64,
    ready: bool,
}

impl Channel {
    pub fn new(alpha: f64, window_size: usize) -> Self {
        Self {
            filter: ExponentialFilter::new(alpha),
            window: SlidingWindow::new(window_size),
            smoothed: 0.0,
            ready: false,
        }
    }

    fn admit(&mut self, value: f64) -> f64 {
        let filtered = self.filter.update(value);
        self.smoothed = self.window.push(filtered);
        self.ready = true;
        filtered
    }

    pub fn smoothed(&self) -> f64 {
        self.smoothed
    }

    pub fn last_filtered(&self) -> f64 {
        self.filter.value()
    }

    /// Whether at least one sample has been admitted since startup.
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

pub struct SignalConditioner {
    heart_rate: Channel,
    motion: Channel,
    accumulator: SampleAccumulator,
    confidence_gate: u8,
    raw_hr_passthrough: bool,
}

impl SignalConditioner {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            heart_rate: Channel::new(config.alpha, config.window_size),
            motion: Channel::new(config.alpha, config.window_size),
            accumulator: SampleAccumulator::default(),
            confidence_gate: config.hr_confidence_gate,
            raw_hr_passthrough: config.raw_hr_passthrough,
        }
    }

    pub fn on_heart_rate(&mut self, sample: HeartRateSample) -> Admission {
        if !sample.bpm.is_finite() {
            return Admission::Rejected;
        }

        if self.raw_hr_passthrough {
            self.heart_rate.smoothed = sample.bpm;
        }

        if sample.confidence <= self.confidence_gate {
            return Admission::Rejected;
        }

        let filtered = self.heart_rate.admit(sample.bpm);
        self.accumulator.heart_rate.push(filtered);
        Admission::Admitted
    }

    /// Returns the new smoothed motion, or `None` for a non-finite vector.
    pub fn on_acceleration(&mut self, sample: AccelSample) -> Option<f64> {
        let magnitude = sample.magnitude();
        if !magnitude.is_finite() {
            return None;
        }

        let filtered = self.motion.admit(magnitude);
        self.accumulator.motion.push(filtered);
        Some(self.motion.smoothed)
    }

    pub fn is_ready(&self) -> bool {
        self.heart_rate.is_ready() && self.motion.is_ready()
    }

    pub fn heart_rate(&self) -> &Channel {
        &self.heart_rate
    }

    pub fn motion(&self) -> &Channel {
        &self.motion
    }

    pub fn accumulator(&self) -> &SampleAccumulator {
        &self.accumulator
    }

    pub fn accumulator_mut(&mut self) -> &mut SampleAccumulator {
        &mut self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditioner(gate: u8) -> SignalConditioner {
        SignalConditioner::new(&PipelineConfig {
            hr_confidence_gate: gate,
            ..Default::default()
        })
    }

    #[test]
    fn admits_confident_heart_rate() {
        let mut c = conditioner(50);
        assert_eq!(
            c.on_heart_rate(HeartRateSample::new(60.0, 90)),
            Admission::Admitted
        );
        // filter: 0.1 * 60 = 6, window mean of [6] = 6
        assert!((c.heart_rate().smoothed() - 6.0).abs() < 1e-12);
        assert!((c.heart_rate().last_filtered() - 6.0).abs() < 1e-12);
        assert_eq!(c.accumulator().heart_rate().len(), 1);
        assert!(c.heart_rate().is_ready());
    }

    #[test]
    fn gate_is_strict() {
        let mut c = conditioner(50);
        assert_eq!(
            c.on_heart_rate(HeartRateSample::new(60.0, 50)),
            Admission::Rejected
        );
        assert_eq!(
            c.on_heart_rate(HeartRateSample::new(60.0, 51)),
            Admission::Admitted
        );
    }

    #[test]
    fn rejected_sample_changes_nothing() {
        let mut c = conditioner(80);
        c.on_heart_rate(HeartRateSample::new(60.0, 95));
        let smoothed = c.heart_rate().smoothed();
        let filtered = c.heart_rate().last_filtered();

        assert_eq!(
            c.on_heart_rate(HeartRateSample::new(180.0, 70)),
            Admission::Rejected
        );
        assert_eq!(c.heart_rate().smoothed(), smoothed);
        assert_eq!(c.heart_rate().last_filtered(), filtered);
        assert_eq!(c.heart_rate.window.len(), 1);
        assert_eq!(c.accumulator().heart_rate().len(), 1);
    }

    #[test]
    fn rejected_first_sample_leaves_channel_unready() {
        let mut c = conditioner(50);
        c.on_heart_rate(HeartRateSample::new(60.0, 10));
        assert!(!c.heart_rate().is_ready());
        assert_eq!(c.heart_rate().smoothed(), 0.0);
    }

    #[test]
    fn raw_passthrough_exposes_bpm_even_when_rejected() {
        let mut c = SignalConditioner::new(&PipelineConfig {
            raw_hr_passthrough: true,
            ..Default::default()
        });
        c.on_heart_rate(HeartRateSample::new(72.0, 10));
        assert_eq!(c.heart_rate().smoothed(), 72.0);
        assert!(!c.heart_rate().is_ready());
        assert!(c.accumulator().heart_rate().is_empty());
    }

    #[test]
    fn non_finite_heart_rate_is_rejected() {
        let mut c = conditioner(50);
        assert_eq!(
            c.on_heart_rate(HeartRateSample::new(f64::NAN, 99)),
            Admission::Rejected
        );
        assert!(!c.heart_rate().is_ready());
    }

    #[test]
    fn motion_is_always_admitted() {
        let mut c = conditioner(50);
        let smoothed = c.on_acceleration(AccelSample::new(0.0, 0.0, 2.0)).unwrap();
        // magnitude 1.0, filtered 0.1
        assert!((smoothed - 0.1).abs() < 1e-12);
        assert!(c.motion().is_ready());
        assert_eq!(c.accumulator().motion(), &[smoothed]);
    }

    #[test]
    fn motion_ignores_non_finite_vector() {
        let mut c = conditioner(50);
        assert!(
            c.on_acceleration(AccelSample::new(f64::INFINITY, 0.0, 0.0))
                .is_none()
        );
        assert!(!c.motion().is_ready());
    }

    #[test]
    fn ready_requires_both_channels() {
        let mut c = conditioner(50);
        c.on_acceleration(AccelSample::new(0.0, 0.0, 1.0));
        assert!(!c.is_ready());
        c.on_heart_rate(HeartRateSample::new(55.0, 99));
        assert!(c.is_ready());
    }

    #[test]
    fn accumulator_take_empties_both_channels() {
        let mut c = conditioner(50);
        c.on_heart_rate(HeartRateSample::new(55.0, 99));
        c.on_acceleration(AccelSample::new(0.0, 0.0, 1.0));
        let snapshot = c.accumulator_mut().take();
        assert_eq!(snapshot.heart_rate().len(), 1);
        assert_eq!(snapshot.motion().len(), 1);
        assert!(c.accumulator().is_empty());
    }
}
