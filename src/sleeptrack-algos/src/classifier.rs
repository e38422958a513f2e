use sleeptrack_types::{Stage, Thresholds};

#[derive(Debug, Clone, Copy)]
struct StageWeights {
    heart_rate: u8,
    motion: u8,
}

/// Rule weights, indexed in `Stage::ALL` order.
const WEIGHTS: [StageWeights; 4] = [
    StageWeights {
        heart_rate: 3,
        motion: 3,
    },
    StageWeights {
        heart_rate: 1,
        motion: 2,
    },
    StageWeights {
        heart_rate: 2,
        motion: 1,
    },
    StageWeights {
        heart_rate: 1,
        motion: 0,
    },
];

/// Rule-based stage scoring with a one-tick REM gate: REM may only follow
/// Light, any other REM candidate is emitted as Light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageClassifier {
    last_stage: Stage,
}

impl StageClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_stage(last_stage: Stage) -> Self {
        Self { last_stage }
    }

    pub fn last_stage(&self) -> Stage {
        self.last_stage
    }

    pub fn scores(heart_rate: f64, motion: f64, thresholds: Thresholds) -> [u8; 4] {
        let Thresholds {
            heart_rate: th,
            motion: tm,
        } = thresholds;

        let conditions = [
            (heart_rate > th, motion > tm),
            (heart_rate > th, motion <= tm),
            (heart_rate <= th, motion <= tm),
            (heart_rate <= th / 2.0, motion < tm / 2.0),
        ];

        let mut scores = [0_u8; 4];
        for ((score, weights), (hr_hit, motion_hit)) in
            scores.iter_mut().zip(WEIGHTS).zip(conditions)
        {
            *score = weights.heart_rate * u8::from(hr_hit) + weights.motion * u8::from(motion_hit);
        }
        scores
    }

    /// Highest score wins; on a tie the earlier stage is kept.
    pub fn candidate(scores: &[u8; 4]) -> Stage {
        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        Stage::ALL[best]
    }

    pub fn classify(&mut self, heart_rate: f64, motion: f64, thresholds: Thresholds) -> Stage {
        let candidate = Self::candidate(&Self::scores(heart_rate, motion, thresholds));
        let stage = Self::gate(candidate, self.last_stage);
        self.last_stage = stage;
        stage
    }

    fn gate(candidate: Stage, last_stage: Stage) -> Stage {
        if candidate == Stage::Rem && last_stage != Stage::Light {
            Stage::Light
        } else {
            candidate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW_THRESHOLDS: Thresholds = Thresholds {
        heart_rate: 10.0,
        motion: 0.2,
    };

    #[test]
    fn scores_for_resting_low_hr() {
        // awake 0, light 2, rem 3, deep 1
        assert_eq!(StageClassifier::scores(5.0, 0.05, LOW_THRESHOLDS), [0, 2, 3, 1]);
    }

    #[test]
    fn scores_for_elevated_and_moving() {
        assert_eq!(StageClassifier::scores(80.0, 1.0, LOW_THRESHOLDS), [6, 1, 0, 0]);
    }

    #[test]
    fn rem_allowed_after_light() {
        let mut classifier = StageClassifier::with_last_stage(Stage::Light);
        assert_eq!(classifier.classify(5.0, 0.05, LOW_THRESHOLDS), Stage::Rem);
        assert_eq!(classifier.last_stage(), Stage::Rem);
    }

    #[test]
    fn rem_redirected_to_light_otherwise() {
        let mut classifier = StageClassifier::with_last_stage(Stage::Awake);
        assert_eq!(classifier.classify(5.0, 0.05, LOW_THRESHOLDS), Stage::Light);
        assert_eq!(classifier.last_stage(), Stage::Light);
    }

    #[test]
    fn rem_needs_light_in_the_immediately_preceding_tick() {
        let mut classifier = StageClassifier::with_last_stage(Stage::Deep);
        assert_eq!(classifier.classify(5.0, 0.05, LOW_THRESHOLDS), Stage::Light);
        assert_eq!(classifier.classify(5.0, 0.05, LOW_THRESHOLDS), Stage::Rem);
        assert_eq!(classifier.classify(5.0, 0.05, LOW_THRESHOLDS), Stage::Light);
        assert_eq!(classifier.classify(5.0, 0.05, LOW_THRESHOLDS), Stage::Rem);
    }

    #[test]
    fn tie_keeps_first_declared_stage() {
        assert_eq!(StageClassifier::candidate(&[2, 2, 1, 0]), Stage::Awake);
        assert_eq!(StageClassifier::candidate(&[0, 3, 3, 3]), Stage::Light);
        assert_eq!(StageClassifier::candidate(&[0, 0, 0, 0]), Stage::Awake);
        assert_eq!(StageClassifier::candidate(&[0, 1, 1, 2]), Stage::Deep);
    }

    #[test]
    fn awake_when_hr_and_motion_elevated() {
        let mut classifier = StageClassifier::new();
        assert_eq!(classifier.classify(80.0, 1.0, LOW_THRESHOLDS), Stage::Awake);
    }

    #[test]
    fn light_when_hr_elevated_but_still() {
        // awake 3, light 1 + 2 = 3 -> tie keeps awake
        assert_eq!(StageClassifier::scores(80.0, 0.1, LOW_THRESHOLDS), [3, 3, 1, 0]);
        let mut classifier = StageClassifier::new();
        assert_eq!(classifier.classify(80.0, 0.1, LOW_THRESHOLDS), Stage::Awake);
    }

    #[test]
    fn deep_never_outscores_rem_with_current_weights() {
        for hr in [0.0, 2.0, 4.9, 5.0, 9.0] {
            for m in [0.0, 0.05, 0.15, 0.2] {
                let scores = StageClassifier::scores(hr, m, LOW_THRESHOLDS);
                assert!(scores[Stage::Deep.index()] < scores[Stage::Rem.index()]);
            }
        }
    }

    #[test]
    fn classify_is_deterministic() {
        for last in Stage::ALL {
            let mut a = StageClassifier::with_last_stage(last);
            let mut b = StageClassifier::with_last_stage(last);
            for (hr, m) in [(5.0, 0.05), (80.0, 1.0), (12.0, 0.1), (9.0, 0.3)] {
                assert_eq!(
                    a.classify(hr, m, LOW_THRESHOLDS),
                    b.classify(hr, m, LOW_THRESHOLDS)
                );
                assert_eq!(a, b);
            }
        }
    }
}
