use chrono::{DateTime, NaiveDate, Utc};

use crate::Stage;

/// One classification result, produced once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub heart_rate: f64,
    pub motion: f64,
    pub stage: Stage,
}

impl ClassificationRecord {
    pub fn new(timestamp: i64, heart_rate: f64, motion: f64, stage: Stage) -> Self {
        Self {
            timestamp,
            heart_rate,
            motion,
            stage,
        }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// UTC calendar date the record belongs to in the daily log.
    pub fn day(&self) -> Option<NaiveDate> {
        self.time().map(|t| t.date_naive())
    }
}
