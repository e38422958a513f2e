/// Static gravity baseline removed from the accelerometer magnitude, in g.
const GRAVITY_G: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub bpm: f64,
    /// Sensor confidence, 0..=100.
    pub confidence: u8,
}

/// Triaxial acceleration in units of standard gravity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SensorEvent {
    HeartRate(HeartRateSample),
    Accel(AccelSample),
}

impl HeartRateSample {
    pub fn new(bpm: f64, confidence: u8) -> Self {
        Self { bpm, confidence }
    }
}

impl AccelSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Vector magnitude with the 1g baseline removed, so a wrist at rest reads ~0.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt() - GRAVITY_G
    }
}

impl From<HeartRateSample> for SensorEvent {
    fn from(sample: HeartRateSample) -> Self {
        Self::HeartRate(sample)
    }
}

impl From<AccelSample> for SensorEvent {
    fn from(sample: AccelSample) -> Self {
        Self::Accel(sample)
    }
}
