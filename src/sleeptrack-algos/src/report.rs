use std::fmt;

use sleeptrack_types::{ClassificationRecord, Stage};

use crate::helpers::stats::percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepTip {
    SteadyBedtime,
    ReduceAwakenings,
    BoostDeepSleep,
}

impl SleepTip {
    pub fn message(self) -> &'static str {
        match self {
            SleepTip::SteadyBedtime => "Keep a steady bedtime!",
            SleepTip::ReduceAwakenings => "Wind down to reduce awakenings.",
            SleepTip::BoostDeepSleep => "Dark, cool room boosts deep sleep.",
        }
    }
}

/// Stage occupancy over a set of records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepReport {
    pub total: usize,
    /// Whole percentages indexed in `Stage::ALL` order. Rounded independently,
    /// so they need not add up to exactly 100.
    pub percentages: [u8; 4],
    pub tip: SleepTip,
}

impl SleepReport {
    const MAX_AWAKE_PERCENT: u8 = 30;
    const MIN_DEEP_PERCENT: u8 = 20;

    pub fn from_records<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ClassificationRecord>,
    {
        let mut counts = [0_usize; 4];
        for record in records {
            counts[record.stage.index()] += 1;
        }

        let total = counts.iter().sum::<usize>();
        if total == 0 {
            return None;
        }

        let percentages = counts.map(|count| percent(count, total));
        Some(Self {
            total,
            percentages,
            tip: Self::tip(&percentages),
        })
    }

    pub fn percent(&self, stage: Stage) -> u8 {
        self.percentages[stage.index()]
    }

    fn tip(percentages: &[u8; 4]) -> SleepTip {
        if percentages[Stage::Awake.index()] > Self::MAX_AWAKE_PERCENT {
            SleepTip::ReduceAwakenings
        } else if percentages[Stage::Deep.index()] < Self::MIN_DEEP_PERCENT {
            SleepTip::BoostDeepSleep
        } else {
            SleepTip::SteadyBedtime
        }
    }
}

impl fmt::Display for SleepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Awake: {}%", self.percent(Stage::Awake))?;
        writeln!(f, "Light: {}%", self.percent(Stage::Light))?;
        writeln!(f, "REM:   {}%", self.percent(Stage::Rem))?;
        writeln!(f, "Deep:  {}%", self.percent(Stage::Deep))?;
        write!(f, "Tip: {}", self.tip.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(stages: &[(Stage, usize)]) -> Vec<ClassificationRecord> {
        let mut t = 0;
        let mut out = Vec::new();
        for &(stage, count) in stages {
            for _ in 0..count {
                out.push(ClassificationRecord::new(t, 50.0, 0.0, stage));
                t += 1;
            }
        }
        out
    }

    #[test]
    fn empty_records_have_no_report() {
        assert!(SleepReport::from_records(&Vec::<ClassificationRecord>::new()).is_none());
    }

    #[test]
    fn restless_night_suggests_winding_down() {
        let r = records(&[(Stage::Awake, 4), (Stage::Light, 3), (Stage::Deep, 3)]);
        let report = SleepReport::from_records(&r).unwrap();
        assert_eq!(report.percentages, [40, 30, 0, 30]);
        assert_eq!(report.tip, SleepTip::ReduceAwakenings);
    }

    #[test]
    fn shallow_night_suggests_deep_sleep() {
        let r = records(&[(Stage::Awake, 1), (Stage::Light, 6), (Stage::Rem, 2), (Stage::Deep, 1)]);
        let report = SleepReport::from_records(&r).unwrap();
        assert_eq!(report.percent(Stage::Deep), 10);
        assert_eq!(report.tip, SleepTip::BoostDeepSleep);
    }

    #[test]
    fn balanced_night_gets_default_tip() {
        let r = records(&[(Stage::Awake, 1), (Stage::Light, 4), (Stage::Rem, 2), (Stage::Deep, 3)]);
        let report = SleepReport::from_records(&r).unwrap();
        assert_eq!(report.total, 10);
        assert_eq!(report.tip, SleepTip::SteadyBedtime);
    }

    #[test]
    fn awake_boundary_is_exclusive() {
        // exactly 30% awake, 20% deep -> default tip
        let r = records(&[(Stage::Awake, 3), (Stage::Light, 5), (Stage::Deep, 2)]);
        let report = SleepReport::from_records(&r).unwrap();
        assert_eq!(report.tip, SleepTip::SteadyBedtime);
    }

    #[test]
    fn display_lists_every_stage() {
        let r = records(&[(Stage::Light, 1)]);
        let text = SleepReport::from_records(&r).unwrap().to_string();
        assert!(text.contains("Light: 100%"));
        assert!(text.contains("REM:   0%"));
        assert!(text.ends_with("Tip: Dark, cool room boosts deep sleep."));
    }
}
