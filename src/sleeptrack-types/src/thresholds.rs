/// Adaptive stage-separation thresholds, one per channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub heart_rate: f64,
    pub motion: f64,
}

impl Thresholds {
    pub const DEFAULT_HEART_RATE: f64 = 50.0;
    pub const DEFAULT_MOTION: f64 = 0.2;

    pub fn new(heart_rate: f64, motion: f64) -> Self {
        Self { heart_rate, motion }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HEART_RATE, Self::DEFAULT_MOTION)
    }
}
