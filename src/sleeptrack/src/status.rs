use std::fmt;

use sleeptrack_algos::{ClassificationPipeline, TickOutcome, helpers::stats::round_float};
use sleeptrack_types::Stage;

/// One-line summary of the current tick, as the watch face showed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusLine {
    pub heart_rate: Option<f64>,
    pub motion: Option<f64>,
    pub stage: Option<Stage>,
}

impl StatusLine {
    pub fn new(pipeline: &ClassificationPipeline, outcome: &TickOutcome) -> Self {
        let conditioner = pipeline.conditioner();
        Self {
            heart_rate: conditioner
                .heart_rate()
                .is_ready()
                .then_some(outcome.record.heart_rate),
            motion: conditioner
                .motion()
                .is_ready()
                .then_some(outcome.record.motion),
            stage: (!outcome.provisional).then_some(outcome.record.stage),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.heart_rate {
            Some(hr) => write!(f, "HR: {}", hr.round() as i64)?,
            None => write!(f, "HR: --")?,
        }
        match self.motion {
            Some(m) => write!(f, " Motion: {:.2}", round_float(m))?,
            None => write!(f, " Motion: --")?,
        }
        match self.stage {
            Some(stage) => write!(f, " Phase: {}", stage),
            None => write!(f, " Phase: Waiting..."),
        }
    }
}
