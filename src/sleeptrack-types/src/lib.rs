#[macro_use]
extern crate serde;

mod stage;
pub use stage::{InvalidStage, Stage};

mod record;
pub use record::ClassificationRecord;

mod sensor;
pub use sensor::{AccelSample, HeartRateSample, SensorEvent};

mod thresholds;
pub use thresholds::Thresholds;
