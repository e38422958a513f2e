use std::collections::VecDeque;

use sleeptrack_types::ClassificationRecord;

use crate::SleepReport;

/// Bounded in-memory record history; the oldest record is evicted first.
#[derive(Debug, Clone)]
pub struct SleepHistory {
    capacity: usize,
    records: VecDeque<ClassificationRecord>,
}

impl SleepHistory {
    /// One hour of records at one per second.
    pub const DEFAULT_CAPACITY: usize = 3600;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a record, returning the evicted one when full.
    pub fn push(&mut self, record: ClassificationRecord) -> Option<ClassificationRecord> {
        let evicted = if self.records.len() >= self.capacity {
            self.records.pop_front()
        } else {
            None
        };
        self.records.push_back(record);
        evicted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&ClassificationRecord> {
        self.records.back()
    }

    pub fn records(&self) -> impl Iterator<Item = &ClassificationRecord> {
        self.records.iter()
    }

    pub fn report(&self) -> Option<SleepReport> {
        SleepReport::from_records(self.records())
    }
}

impl Default for SleepHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
