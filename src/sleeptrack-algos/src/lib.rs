#[macro_use]
extern crate serde;

pub(crate) mod filter;
pub use filter::ExponentialFilter;

pub(crate) mod window;
pub use window::SlidingWindow;

pub(crate) mod config;
pub use config::{ConfigError, PipelineConfig};

pub(crate) mod conditioner;
pub use conditioner::{Admission, Channel, SampleAccumulator, SignalConditioner};

pub(crate) mod calibrator;
pub use calibrator::ThresholdCalibrator;

pub(crate) mod classifier;
pub use classifier::StageClassifier;

pub(crate) mod pipeline;
pub use pipeline::{ClassificationPipeline, TickOutcome};

pub(crate) mod history;
pub use history::SleepHistory;

pub(crate) mod report;
pub use report::{SleepReport, SleepTip};

pub mod helpers;
